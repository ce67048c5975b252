// ABOUTME: Application constants organized by domain
// ABOUTME: Field limits, short link parameters, shopping list formatting, and reserved names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

/// Field length limits shared by validation and schema
pub mod limits {
    /// Maximum length for names (users, tags, ingredients, recipes)
    pub const MAX_NAME_LENGTH: usize = 150;

    /// Maximum length for e-mail addresses
    pub const MAX_EMAIL_LENGTH: usize = 254;

    /// Maximum length for a measurement unit label
    pub const MAX_UNIT_LENGTH: usize = 10;

    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;

    /// Minimum amount of an ingredient in a recipe
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;

    /// Maximum amount of an ingredient in a recipe
    pub const MAX_INGREDIENT_AMOUNT: i64 = 32_000;
}

/// Short link token parameters
pub mod short_links {
    /// Length of generated tokens
    pub const TOKEN_LENGTH: usize = 3;

    /// Maximum stored link length (explicit links may be longer than generated ones)
    pub const MAX_LINK_LENGTH: usize = 10;

    /// Attempts before link allocation is reported as an internal error
    pub const MAX_ALLOCATION_ATTEMPTS: u32 = 16;

    /// Path prefix the resolver is mounted under
    pub const RESOLVE_PREFIX: &str = "/s";
}

/// Shopping list document formatting
pub mod shopping_list {
    /// First line of every rendered shopping list
    pub const HEADER: &str = "Список покупок:";

    /// Download filename
    pub const FILENAME: &str = "list.txt";

    /// Content type of the rendered list
    pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";
}

/// Usernames that collide with route segments
pub const RESERVED_USERNAMES: &[&str] = &["me"];
