// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod registry;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_utils;
