//! Wire form of a [`BitSet`]: a bare sequence of block words, in block
//! order, with no capacity field. Decoding recovers the capacity from the
//! largest block value, so a round trip is only guaranteed to reproduce
//! the blocks themselves.

use crate::bit_set::{BitSet, Block};

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryFrom;
use std::fmt;

impl Serialize for BitSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.blocks.iter())
    }
}

impl<'de> Deserialize<'de> for BitSet {
    fn deserialize<D>(deserializer: D) -> Result<BitSet, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BlockSeqVisitor;

        impl<'de> Visitor<'de> for BlockSeqVisitor {
            type Value = BitSet;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a sequence of unsigned 64-bit blocks")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<BitSet, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut blocks: Vec<Block> = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                let mut size = 0;
                while let Some(block) = seq.next_element::<Block>()? {
                    // The stream carries no capacity field; the largest
                    // block value read so far stands in for it.
                    let bits = usize::try_from(block).map_err(|_| {
                        de::Error::custom("block value exceeds the addressable range")
                    })?;
                    size = size.max(bits);
                    blocks.push(block);
                }
                Ok(BitSet { blocks, size })
            }
        }

        deserializer.deserialize_seq(BlockSeqVisitor)
    }
}
