pub mod preview;
pub mod resize;

pub use preview::{PreviewChannel, ResizePreview};
pub use resize::{
    GestureEnd, GesturePhase, GrabZone, PointerPos, ResizeGesture, BODY_DRAG_DEFAULT_MIN,
    BODY_DRAG_PX_PER_STEP, BODY_DRAG_THRESHOLD_PX,
};
