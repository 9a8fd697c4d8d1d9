// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use entity_schema::{Entity, ForwardRefs, SchemaVariant, synthesize_for};
use uuid::Uuid;

#[derive(Entity)]
pub struct AuditLog {
    #[id]
    pub id: Uuid,
    #[field(update = false)]
    pub action: String,
    #[created_at]
    pub created_at: DateTime<Utc>
}

fn main() {
    let update = synthesize_for::<AuditLog>(SchemaVariant::Update, &ForwardRefs::new()).unwrap();
    assert!(update.fields().is_empty());
}
