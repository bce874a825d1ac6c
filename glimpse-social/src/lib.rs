//! Upstream content clients used by Glimpse.
//!
//! Only the Instagram pipeline exists. The [`instagram::ContentApi`] trait is
//! the seam the feed layer depends on; [`instagram::InstagramApi`] is the HTTP
//! implementation in its anonymous and session-authenticated variants.
pub mod instagram;
