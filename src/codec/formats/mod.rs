// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in codecs and their factories.
//!
//! - [`ldeoih`] - in-house binary format carrying the full canonical model
//! - [`mgd77`] - MGD77 fixed-width underway records
//! - [`xyz`] - ASCII sounding tables

pub mod ldeoih;
pub mod mgd77;
pub mod xyz;

pub use ldeoih::LdeoihCodec;
pub use mgd77::Mgd77Codec;
pub use xyz::{XyzCodec, XyzLayout};

use super::{CodecFactory, SwathCodec};

/// Factory for [`LdeoihCodec`].
pub struct LdeoihFactory;

impl CodecFactory for LdeoihFactory {
    fn create(&self) -> Box<dyn SwathCodec> {
        Box::new(LdeoihCodec::new())
    }
}

/// Factory for [`Mgd77Codec`].
pub struct Mgd77Factory {
    pub crlf: bool,
}

impl CodecFactory for Mgd77Factory {
    fn create(&self) -> Box<dyn SwathCodec> {
        Box::new(Mgd77Codec::new(self.crlf))
    }
}

/// Factory for [`XyzCodec`].
pub struct XyzFactory {
    pub layout: XyzLayout,
}

impl CodecFactory for XyzFactory {
    fn create(&self) -> Box<dyn SwathCodec> {
        Box::new(XyzCodec::new(self.layout))
    }
}
