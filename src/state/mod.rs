mod packet;
mod snapshot;
mod visual;

pub use packet::{Packet, PacketStatus, Rgba};
pub use snapshot::{DashboardView, IconView, PacketView, Snapshot, TiltPose};
pub use visual::{Dashboard, IconTimers, SharedState, TiltDirection, VisualState};
