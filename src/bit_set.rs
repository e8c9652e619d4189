use log::debug;
use std::fmt;

/// Storage word of the packed bit buffer.
pub type Block = u64;

/// Membership bits held by one block.
pub const BLOCK_BITS: usize = 64;

/// A fixed-capacity set of small integers packed into [`Block`]s.
///
/// Capacity is chosen at construction and never grows; membership of
/// element `i` is bit `i % 64` of block `i / 64`. All operations that
/// touch the buffer go through the scoped [`read`](BitSet::read) /
/// [`update`](BitSet::update) accessors, so no raw view of the blocks
/// ever outlives a single call.
///
/// Elements past the last allocated block trap on the buffer bounds
/// check. The final block may carry more bits than `size` (capacity is
/// rounded up to a whole block) and those positions are addressable.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    pub(crate) blocks: Vec<Block>,
    pub(crate) size: usize,
}

impl BitSet {
    /// Creates an empty set able to hold `bits` elements.
    pub fn with_capacity(bits: usize) -> BitSet {
        let block_count = bits.div_ceil(BLOCK_BITS);
        debug!("bit set of {} bits backed by {} blocks", bits, block_count);
        BitSet {
            blocks: vec![0; block_count],
            size: bits,
        }
    }

    /// Declared capacity in bits.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn read<R>(&self, body: impl FnOnce(&[Block]) -> R) -> R {
        body(&self.blocks)
    }

    #[inline(always)]
    fn update(&mut self, body: impl FnOnce(&mut [Block])) {
        body(&mut self.blocks)
    }

    /// Adds `element` to the set. Inserting a member again is a no-op.
    #[inline]
    pub fn insert(&mut self, element: usize) {
        let index = block_index(element);
        let mask = bit_mask(element);
        self.update(|blocks| blocks[index] |= mask);
    }

    /// Removes `element` from the set. Removing a non-member is a no-op.
    #[inline]
    pub fn remove(&mut self, element: usize) {
        let index = block_index(element);
        let mask = bit_mask(element);
        self.update(|blocks| blocks[index] &= !mask);
    }

    /// Whether `element` is a member.
    #[inline]
    pub fn contains(&self, element: usize) -> bool {
        let index = block_index(element);
        let mask = bit_mask(element);
        self.read(|blocks| blocks[index] & mask != 0)
    }

    #[inline]
    pub fn get(&self, element: usize) -> bool {
        self.contains(element)
    }

    #[inline]
    pub fn set(&mut self, element: usize, value: bool) {
        if value {
            self.insert(element);
        } else {
            self.remove(element);
        }
    }

    /// Number of members. Recomputed on every call, never cached.
    pub fn count(&self) -> usize {
        self.read(|blocks| blocks.iter().map(|block| block.count_ones() as usize).sum())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read(|blocks| blocks.iter().all(|&block| block == 0))
    }

    /// Smallest member, or `None` when the set is empty.
    pub fn min(&self) -> Option<usize> {
        self.read(|blocks| {
            blocks
                .iter()
                .enumerate()
                .find(|&(_, &block)| block != 0)
                .map(|(index, &block)| index * BLOCK_BITS + block.trailing_zeros() as usize)
        })
    }

    /// Largest member, or `None` when the set is empty.
    pub fn max(&self) -> Option<usize> {
        self.read(|blocks| {
            blocks
                .iter()
                .enumerate()
                .rev()
                .find(|&(_, &block)| block != 0)
                .map(|(index, &block)| {
                    index * BLOCK_BITS + (BLOCK_BITS - 1 - block.leading_zeros() as usize)
                })
        })
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> crate::iter::Iter<'_> {
        crate::iter::Iter::new(self)
    }
}

#[inline(always)]
fn block_index(element: usize) -> usize {
    element / BLOCK_BITS
}

#[inline(always)]
fn bit_mask(element: usize) -> Block {
    1 << (element % BLOCK_BITS)
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet[")?;
        self.read(|blocks| {
            for (index, block) in blocks.iter().enumerate() {
                if index > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", block)?;
            }
            Ok(())
        })?;
        write!(f, "]")
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
