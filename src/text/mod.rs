//! Text measurement and the name tag.

pub mod shaper;
pub mod tag;

pub use shaper::{FontdueShaper, MonospaceShaper, TextBounds, TextShaper};
pub use tag::{
    FIT_MAX_TRIES, FIT_SHRINK, FitOutcome, SanteeIdentity, TOO_LONG_TEXT, TagText, TextBlock,
    fit_text,
};
