// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![allow(dead_code)]

use entity_schema::Entity;

#[derive(Entity)]
pub struct Wrapper<T> {
    pub value: T
}

fn main() {}
