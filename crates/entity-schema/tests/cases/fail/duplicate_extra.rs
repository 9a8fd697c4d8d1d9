// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use entity_schema::Entity;

#[derive(Entity)]
#[extra(word_count: i64)]
#[extra(word_count: i32)]
pub struct Article {
    pub title: String
}

fn main() {}
