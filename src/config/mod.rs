// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration: ports, database location, public URL, paging, hashing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Recipe Share Contributors

//! Configuration module for the recipe sharing server
//!
//! All settings come from environment variables; there is no configuration
//! file. Binaries may override individual values from the command line.

/// Environment and server configuration
pub mod environment;
