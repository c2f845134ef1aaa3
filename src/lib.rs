// This file is part of smc, a state machine compiler.
// Copyright 2022 Jeffrey Sharp
//
// SPDX-License-Identifier: GPL-3.0-or-later
//
// smc is free software: you can redistribute it and/or modify it
// under the terms of the GNU General Public License as published
// by the Free Software Foundation, either version 3 of the License,
// or (at your option) any later version.
//
// smc is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See
// the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with smc.  If not, see <http://www.gnu.org/licenses/>.

//! State machine compiler.
//!
//! Reads `.sm` state machine definitions and generates table-driven C code.

pub mod emit;
pub mod lang;
pub mod message;
pub mod session;
pub mod symbol;
pub mod util;
pub mod validate;

/// Program name, used as the source of messages not tied to an input file.
pub const PROGRAM_NAME: &str = "smc";
