// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side operations.
//!
//! Ticket and roster mutations run as a single IMMEDIATE transaction:
//! the write lock is taken before the current record is read, the pure
//! transition from `helpdesk` runs against what was read, and the result
//! is written back guarded by the row's `version`. A rejected transition
//! rolls the transaction back and leaves no trace.

pub mod notifications;
pub mod rosters;
pub mod tickets;
pub mod users;
