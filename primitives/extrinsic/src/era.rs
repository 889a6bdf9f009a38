// Copyright (C) Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.

//! Transaction validity window.
//!
//! The wire format and the arithmetic of the era are those of `sp_runtime::generic::Era`. This
//! type only names the period and phase of the mortal era.

use codec::{Decode, Encode, EncodeLike, Input, Output};
use serde::{Deserialize, Serialize};
use sp_runtime::generic;

/// Minimal mortal era period.
pub const MIN_MORTAL_PERIOD: u64 = 4;
/// Maximal mortal era period.
pub const MAX_MORTAL_PERIOD: u64 = 1 << 16;

/// Era of the transaction: the range of blocks where the transaction is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Era {
	/// Transaction is valid forever. The anchor block is the genesis block.
	Immortal,
	/// Transaction is valid within `period` blocks, starting at the block where
	/// `block_number % period == phase`.
	///
	/// Periods outside of the `[MIN_MORTAL_PERIOD; MAX_MORTAL_PERIOD]` range or that are not
	/// powers of two are normalized the same way as in `Era::mortal`.
	Mortal {
		/// Number of blocks the transaction is valid for. Power of two.
		period: u64,
		/// Offset of the anchor block within the period.
		phase: u64,
	},
}

impl Era {
	/// Create mortal era, anchored at `current` block.
	///
	/// The period is rounded up to the next power of two and clamped to the
	/// `[MIN_MORTAL_PERIOD; MAX_MORTAL_PERIOD]` range. The phase is quantized so that it fits
	/// into the two-byte encoding.
	pub fn mortal(period: u64, current: u64) -> Self {
		generic::Era::mortal(period, current).into()
	}

	/// Get the block number of the start of the era whose properties this object describes
	/// that `current` belongs to.
	pub fn birth(self, current: u64) -> u64 {
		generic::Era::from(self).birth(current)
	}

	/// Get the block number of the first block at which the era has ended.
	pub fn death(self, current: u64) -> u64 {
		generic::Era::from(self).death(current)
	}
}

impl From<Era> for generic::Era {
	fn from(era: Era) -> Self {
		match era {
			Era::Immortal => generic::Era::Immortal,
			// valid period and phase are kept as is
			Era::Mortal { period, phase } => generic::Era::mortal(period, phase),
		}
	}
}

impl From<generic::Era> for Era {
	fn from(era: generic::Era) -> Self {
		match era {
			generic::Era::Immortal => Era::Immortal,
			generic::Era::Mortal(period, phase) => Era::Mortal { period, phase },
		}
	}
}

impl Encode for Era {
	fn size_hint(&self) -> usize {
		generic::Era::from(*self).size_hint()
	}

	fn encode_to<T: Output + ?Sized>(&self, output: &mut T) {
		generic::Era::from(*self).encode_to(output)
	}
}

impl EncodeLike for Era {}

impl Decode for Era {
	fn decode<I: Input>(input: &mut I) -> Result<Self, codec::Error> {
		generic::Era::decode(input).map(Into::into)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn immortal_works() {
		let era = Era::Immortal;
		assert_eq!(era.encode(), vec![0u8]);
		assert_eq!(era.birth(42), 0);
		assert_eq!(era.death(42), u64::MAX);
		assert_eq!(Era::decode(&mut &[0u8][..]).ok(), Some(Era::Immortal));
	}

	#[test]
	fn mortal_codec_works() {
		let era = Era::mortal(64, 42);
		assert_eq!(era, Era::Mortal { period: 64, phase: 42 });
		assert_eq!(era.encode(), vec![5 + 42 % 16 * 16, 42 / 16]);
		assert_eq!(Era::decode(&mut &era.encode()[..]).ok(), Some(era));
	}

	#[test]
	fn long_period_mortal_codec_works() {
		let era = Era::mortal(32768, 20000);
		assert_eq!(era.encode(), vec![(14 + 2500 % 16 * 16) as u8, (2500 / 16) as u8]);
		assert_eq!(Era::decode(&mut &era.encode()[..]).ok(), Some(era));
	}

	#[test]
	fn mortal_period_is_normalized() {
		assert_eq!(Era::mortal(1, 7), Era::Mortal { period: 4, phase: 3 });
		assert_eq!(Era::mortal(100, 1000), Era::Mortal { period: 128, phase: 1000 % 128 });
		assert_eq!(Era::mortal(1 << 20, 5), Era::Mortal { period: 1 << 16, phase: 0 });
	}

	#[test]
	fn out_of_range_mortal_era_is_normalized() {
		let era = Era::Mortal { period: 1, phase: 0 };
		assert_eq!(era.encode(), Era::mortal(4, 0).encode());
		assert_eq!(era.birth(10), 8);
		assert_eq!(era.death(10), 12);

		let era = Era::Mortal { period: 0, phase: 0 };
		assert_eq!(era.birth(10), Era::mortal(4, 0).birth(10));
	}

	#[test]
	fn era_initialization_works() {
		let era = Era::mortal(4, 6);
		assert_eq!(era.birth(6), 6);
		assert_eq!(era.death(6), 10);
		assert_eq!(era.birth(9), 6);
		assert_eq!(era.birth(10), 10);
	}
}
