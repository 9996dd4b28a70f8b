//! Shared test harness modules for the AccessMap CLI.

use super::*;

mod helpers;
