//! The fixed limb set and the joint-drive controller contract.
//!
//! The limb set is static and known at compile time, so body parts live in a
//! fixed-size array indexed by [`BodyPartId`] rather than a keyed map.

use bevy::math::{Quat, Vec3};
use bevy::prelude::Resource;

// ---------------------------------------------------------------------------
// BodyPartId
// ---------------------------------------------------------------------------

/// The sixteen limb slots of the ragdoll, in wire order.
///
/// [`BodyPartId::ALL`] is the canonical iteration order for per-part
/// observations; changing it silently corrupts a trained policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyPartId {
    Hips,
    Chest,
    Spine,
    Head,
    ThighL,
    ShinL,
    FootL,
    ThighR,
    ShinR,
    FootR,
    ArmL,
    ForearmL,
    HandL,
    ArmR,
    ForearmR,
    HandR,
}

impl BodyPartId {
    /// Number of limb slots.
    pub const COUNT: usize = 16;

    /// All slots in canonical order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Hips,
        Self::Chest,
        Self::Spine,
        Self::Head,
        Self::ThighL,
        Self::ShinL,
        Self::FootL,
        Self::ThighR,
        Self::ShinR,
        Self::FootR,
        Self::ArmL,
        Self::ForearmL,
        Self::HandL,
        Self::ArmR,
        Self::ForearmR,
        Self::HandR,
    ];

    /// Index into the controller's part array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Snake-case label for logging and parameter names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hips => "hips",
            Self::Chest => "chest",
            Self::Spine => "spine",
            Self::Head => "head",
            Self::ThighL => "thigh_l",
            Self::ShinL => "shin_l",
            Self::FootL => "foot_l",
            Self::ThighR => "thigh_r",
            Self::ShinR => "shin_r",
            Self::FootR => "foot_r",
            Self::ArmL => "arm_l",
            Self::ForearmL => "forearm_l",
            Self::HandL => "hand_l",
            Self::ArmR => "arm_r",
            Self::ForearmR => "forearm_r",
            Self::HandR => "hand_r",
        }
    }

    /// Whether this slot is one of the two hands.
    #[must_use]
    pub const fn is_hand(self) -> bool {
        matches!(self, Self::HandL | Self::HandR)
    }
}

// ---------------------------------------------------------------------------
// InitialPose
// ---------------------------------------------------------------------------

/// Recorded spawn pose, restored on episode reset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub local_rotation: Quat,
}

impl Default for InitialPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            local_rotation: Quat::IDENTITY,
        }
    }
}

// ---------------------------------------------------------------------------
// BodyPart
// ---------------------------------------------------------------------------

/// Per-limb physics state and joint command slots.
///
/// Kinematic fields (`velocity` through `current_strength`) are written by
/// the physics solver and only read by the agent. Command fields
/// (`target_rotation`, `strength_command`) are written by the agent and
/// consumed by the solver.
#[derive(Clone, Copy, Debug)]
pub struct BodyPart {
    /// Rigid-body linear velocity, world space (m/s).
    pub velocity: Vec3,
    /// Rigid-body angular velocity, world space (rad/s).
    pub angular_velocity: Vec3,
    /// World position.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Rotation relative to the parent limb.
    pub local_rotation: Quat,
    /// Ground-contact flag from the solver's contact reporting.
    pub touching_ground: bool,
    /// Realized joint strength in newtons.
    pub current_strength: f32,
    /// Rigid-body mass (kg).
    pub mass: f32,
    /// Commanded target rotation per axis, normalized to [-1, 1].
    pub target_rotation: Vec3,
    /// Last raw strength scalar commanded by the policy.
    pub strength_command: f32,
    initial: InitialPose,
}

impl Default for BodyPart {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            local_rotation: Quat::IDENTITY,
            touching_ground: false,
            current_strength: 0.0,
            mass: 1.0,
            target_rotation: Vec3::ZERO,
            strength_command: 0.0,
            initial: InitialPose {
                position: Vec3::ZERO,
                rotation: Quat::IDENTITY,
                local_rotation: Quat::IDENTITY,
            },
        }
    }
}

impl BodyPart {
    /// Create a part at a spawn pose, recording it as the reset target.
    #[must_use]
    pub fn at_pose(position: Vec3, rotation: Quat) -> Self {
        let mut part = Self {
            position,
            rotation,
            ..Self::default()
        };
        part.record_initial();
        part
    }

    /// Record the current pose as the pose restored by [`reset`](Self::reset).
    pub fn record_initial(&mut self) {
        self.initial = InitialPose {
            position: self.position,
            rotation: self.rotation,
            local_rotation: self.local_rotation,
        };
    }

    /// The recorded spawn pose.
    #[must_use]
    pub const fn initial(&self) -> InitialPose {
        self.initial
    }

    /// Restore the recorded pose and zero all dynamic state and commands.
    pub fn reset(&mut self) {
        self.position = self.initial.position;
        self.rotation = self.initial.rotation;
        self.local_rotation = self.initial.local_rotation;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.touching_ground = false;
        self.current_strength = 0.0;
        self.target_rotation = Vec3::ZERO;
        self.strength_command = 0.0;
    }
}

// ---------------------------------------------------------------------------
// JointDriveController
// ---------------------------------------------------------------------------

const fn default_max_joint_force_limit() -> f32 {
    20_000.0
}

/// Owner of the sixteen body parts and their joint command slots.
///
/// The agent reads kinematic state through [`part`](Self::part) and issues
/// commands through [`set_joint_target_rotation`](Self::set_joint_target_rotation)
/// and [`set_joint_strength`](Self::set_joint_strength); the physics solver
/// consumes the commands and writes the kinematics back between decisions.
#[derive(Resource, Clone, Debug)]
pub struct JointDriveController {
    parts: [BodyPart; BodyPartId::COUNT],
    max_joint_force_limit: f32,
}

impl Default for JointDriveController {
    fn default() -> Self {
        Self {
            parts: [BodyPart::default(); BodyPartId::COUNT],
            max_joint_force_limit: default_max_joint_force_limit(),
        }
    }
}

impl JointDriveController {
    /// Create with an explicit joint force limit.
    #[must_use]
    pub fn new(max_joint_force_limit: f32) -> Self {
        Self {
            max_joint_force_limit,
            ..Self::default()
        }
    }

    /// Global maximum joint force (newtons); strength observations are
    /// normalized against this.
    #[must_use]
    pub const fn max_joint_force_limit(&self) -> f32 {
        self.max_joint_force_limit
    }

    /// Read a body part's state.
    #[must_use]
    pub const fn part(&self, id: BodyPartId) -> &BodyPart {
        &self.parts[id.index()]
    }

    /// Mutable access for the physics solver (and episode reset).
    pub const fn part_mut(&mut self, id: BodyPartId) -> &mut BodyPart {
        &mut self.parts[id.index()]
    }

    /// Command a joint's target rotation, one normalized scalar per axis.
    /// Values are clamped to [-1, 1]; the solver maps them onto the joint's
    /// configured angular limits.
    pub fn set_joint_target_rotation(&mut self, id: BodyPartId, x: f32, y: f32, z: f32) {
        self.parts[id.index()].target_rotation = Vec3::new(
            x.clamp(-1.0, 1.0),
            y.clamp(-1.0, 1.0),
            z.clamp(-1.0, 1.0),
        );
    }

    /// Command a joint's strength from a raw policy scalar.
    ///
    /// The scalar is remapped from [-1, 1] to [0, `max_joint_force_limit`].
    /// Commands below -1 (the arm-strength handicap can produce them) clamp
    /// to zero force, never negative.
    pub fn set_joint_strength(&mut self, id: BodyPartId, value: f32) {
        let part = &mut self.parts[id.index()];
        part.strength_command = value;
        part.current_strength = ((value + 1.0) * 0.5 * self.max_joint_force_limit).max(0.0);
    }

    /// Restore one body part to its recorded initial condition.
    pub fn reset_body_part(&mut self, id: BodyPartId) {
        self.parts[id.index()].reset();
    }

    /// Arithmetic mean of all body-part linear velocities.
    ///
    /// Averaging over every rigid body rather than the hips alone damps the
    /// erratic limb motion a hips-only estimate rewards.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_velocity(&self) -> Vec3 {
        let sum: Vec3 = self.parts.iter().map(|p| p.velocity).sum();
        sum / BodyPartId::COUNT as f32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
