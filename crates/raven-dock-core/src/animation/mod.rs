mod icon_animator;
mod transition;

pub use icon_animator::{dance_rotation, AnimationKind, IconAnimator, IconId, DANCE_PERIOD};
pub use transition::{ease_out_quad, SlideTransition};
