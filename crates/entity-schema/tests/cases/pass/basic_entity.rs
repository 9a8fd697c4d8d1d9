// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use entity_schema::{Entity, ForwardRefs, SchemaVariant, synthesize_for};
use uuid::Uuid;

#[derive(Entity)]
pub struct Tag {
    #[id]
    pub id: Uuid,
    pub label: String
}

fn main() {
    let create = synthesize_for::<Tag>(SchemaVariant::Create, &ForwardRefs::new()).unwrap();
    assert_eq!(create.field_names(), ["label"]);
}
