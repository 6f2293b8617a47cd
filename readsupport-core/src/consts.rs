/// SAM flag bit marking a reverse-strand alignment.
pub const REVERSE_STRAND_FLAG: u16 = 0x10;

/// Upper bound on declared alternates at a single locus.
pub const MAX_ALTERNATES: usize = 15;

/// Reference plus every alternate: the capacity of a ranked category list.
pub const MAX_CANDIDATES: usize = MAX_ALTERNATES + 1;

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// CIGAR string used by SAM for "no alignment".
pub const UNALIGNED_CIGAR: &str = "*";
