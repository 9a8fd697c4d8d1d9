// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use entity_schema::{Entity, ForwardRefs, SchemaVariant, synthesize_for};
use uuid::Uuid;

#[derive(Entity)]
#[entity(name = "Member")]
#[extra(post_count: u32)]
#[extra(friends: "List['MemberRef']")]
pub struct User {
    #[id]
    pub id: Uuid,

    /// Login name.
    pub r#type: String,

    pub nickname: Option<String>,

    #[field(default = 0)]
    pub karma: i64,

    #[field(default = -1)]
    pub rank: i32,

    #[field(default = true)]
    pub active: bool,

    #[field(create, update = false, description = "Immutable handle")]
    pub handle: String,

    #[field(skip)]
    pub password_hash: String,

    #[field(ty = "Optional['TeamRef']")]
    #[belongs_to(Team)]
    pub team_id: Option<Uuid>,

    #[created_at]
    pub created_at: DateTime<Utc>,

    #[updated_at]
    pub updated_at: DateTime<Utc>
}

fn main() {
    let response = synthesize_for::<User>(SchemaVariant::Response, &ForwardRefs::new()).unwrap();
    assert_eq!(response.name(), "MemberResponse");
    assert!(response.contains("type"));
    assert!(response.contains("friends"));
    assert!(!response.contains("password_hash"));
    assert!(!response.is_fully_resolved());
}
