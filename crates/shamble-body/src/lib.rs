//! Body-part state and the joint-drive controller contract for the Shamble
//! walker, plus the actuated ray-perception collaborator.
//!
//! The physics solver owns the dynamics; this crate holds the state it
//! publishes (per-part kinematics, contact, strength) and the command slots
//! it consumes (target rotations, strength commands). The agent crate only
//! ever talks to [`parts::JointDriveController`] and
//! [`perception::ActuatedPerception`].

pub mod parts;
pub mod perception;

pub mod prelude {
    pub use crate::parts::{BodyPart, BodyPartId, InitialPose, JointDriveController};
    pub use crate::perception::{ActuatedPerception, RAY_SENSOR_COUNT, RayPerception};
}
