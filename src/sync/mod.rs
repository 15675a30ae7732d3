// SPDX-License-Identifier: Apache-2.0

//! The two reconciliation triggers: the rotation timer and the
//! namespace-bootstrap event consumer.
//!
//! Both loops may touch the same namespace's objects at the same time.
//! That is expected; correctness comes from the version-checked writes in
//! [`crate::kubernetes`], not from any in-process synchronization.

pub mod bootstrap;
pub mod rotator;

pub use bootstrap::Bootstrapper;
pub use rotator::RotationLoop;
