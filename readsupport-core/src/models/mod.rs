pub mod allele;
pub mod category;
pub mod locus;
pub mod read;
pub mod strictness;
pub mod window;

// re-export for cleaner imports
pub use self::allele::{AlleleCandidate, AlleleError};
pub use self::category::Category;
pub use self::locus::LocusWindow;
pub use self::read::{Read, ReadError, Strand};
pub use self::strictness::StrictnessMode;
pub use self::window::Window;
