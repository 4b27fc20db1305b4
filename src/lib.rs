// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User Auth Server - Stateless Token Authentication Service
//!
//! Issues HS512-signed bearer tokens on login and authorizes every later
//! request from the token alone, without server-side sessions.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token signing, verification and the login/authorization stages
//! - `config` - Environment configuration and the signing configuration
//! - `state` - Shared application state

pub mod api;
pub mod auth;
pub mod config;
pub mod state;
