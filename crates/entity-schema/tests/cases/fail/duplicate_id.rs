// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use entity_schema::Entity;
use uuid::Uuid;

#[derive(Entity)]
pub struct Article {
    #[id]
    pub id: Uuid,
    #[id]
    pub key: Uuid
}

fn main() {}
