// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! Every function takes a plain connection so it can run either on its
//! own or inside a mutation's transaction.

pub mod notifications;
pub mod rosters;
pub mod tickets;
pub mod users;
