//! Declarative action-vector layout.
//!
//! The policy emits one flat continuous vector; these tables define how its
//! scalars map onto joints. Rotation commands come first (per-joint, with a
//! fixed number of actuated axes each), then one strength scalar per driven
//! joint, then optionally two perception scalars. The tables are the single
//! source of truth for both the dispatcher and the action dimension, so the
//! two cannot drift apart.

use shamble_body::parts::BodyPartId;

// ---------------------------------------------------------------------------
// Rotation schema
// ---------------------------------------------------------------------------

/// One joint's slice of the rotation segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationRow {
    pub part: BodyPartId,
    /// Number of actuated axes (1 to 3), consumed in x, y, z order.
    /// Unactuated trailing axes are commanded to zero.
    pub axes: usize,
}

const fn rot(part: BodyPartId, axes: usize) -> RotationRow {
    RotationRow { part, axes }
}

/// Joint rotation slices in wire order. Reordering this table silently
/// corrupts a trained policy.
pub const ROTATION_SCHEMA: [RotationRow; 13] = [
    rot(BodyPartId::Chest, 3),
    rot(BodyPartId::Spine, 3),
    rot(BodyPartId::ThighL, 2),
    rot(BodyPartId::ThighR, 2),
    rot(BodyPartId::ShinL, 1),
    rot(BodyPartId::ShinR, 1),
    rot(BodyPartId::FootR, 3),
    rot(BodyPartId::FootL, 3),
    rot(BodyPartId::ArmL, 2),
    rot(BodyPartId::ArmR, 2),
    rot(BodyPartId::ForearmL, 1),
    rot(BodyPartId::ForearmR, 1),
    rot(BodyPartId::Head, 2),
];

// ---------------------------------------------------------------------------
// Strength schema
// ---------------------------------------------------------------------------

/// One joint's slot in the strength segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrengthRow {
    pub part: BodyPartId,
    /// Subtract the arm-strength multiplier from the raw scalar before it is
    /// applied. Set on the four arm joints only.
    pub arm_handicap: bool,
}

const fn strength(part: BodyPartId, arm_handicap: bool) -> StrengthRow {
    StrengthRow { part, arm_handicap }
}

/// Joint strength slots in wire order, one scalar each.
pub const STRENGTH_SCHEMA: [StrengthRow; 13] = [
    strength(BodyPartId::Chest, false),
    strength(BodyPartId::Spine, false),
    strength(BodyPartId::Head, false),
    strength(BodyPartId::ThighL, false),
    strength(BodyPartId::ShinL, false),
    strength(BodyPartId::FootL, false),
    strength(BodyPartId::ThighR, false),
    strength(BodyPartId::ShinR, false),
    strength(BodyPartId::FootR, false),
    strength(BodyPartId::ArmL, true),
    strength(BodyPartId::ForearmL, true),
    strength(BodyPartId::ArmR, true),
    strength(BodyPartId::ForearmR, true),
];

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Total scalars in the rotation segment.
#[must_use]
pub const fn rotation_len() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < ROTATION_SCHEMA.len() {
        total += ROTATION_SCHEMA[i].axes;
        i += 1;
    }
    total
}

/// Length of the full action vector. Two perception scalars follow the
/// strength segment when actuated perception is enabled.
#[must_use]
pub const fn action_dim(actuated_perception: bool) -> usize {
    let base = rotation_len() + STRENGTH_SCHEMA.len();
    if actuated_perception { base + 2 } else { base }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rotation_segment_has_twenty_six_scalars() {
        assert_eq!(rotation_len(), 26);
    }

    #[test]
    fn action_dims() {
        assert_eq!(action_dim(false), 39);
        assert_eq!(action_dim(true), 41);
    }

    #[test]
    fn rotation_axes_are_in_bounds() {
        for row in &ROTATION_SCHEMA {
            assert!(
                (1..=3).contains(&row.axes),
                "{}: {} axes",
                row.part.label(),
                row.axes
            );
        }
    }

    #[test]
    fn no_joint_appears_twice_in_either_table() {
        let rotated: HashSet<BodyPartId> = ROTATION_SCHEMA.iter().map(|r| r.part).collect();
        assert_eq!(rotated.len(), ROTATION_SCHEMA.len());

        let driven: HashSet<BodyPartId> = STRENGTH_SCHEMA.iter().map(|r| r.part).collect();
        assert_eq!(driven.len(), STRENGTH_SCHEMA.len());
    }

    #[test]
    fn hips_and_hands_are_never_driven() {
        for row in &ROTATION_SCHEMA {
            assert!(row.part != BodyPartId::Hips && !row.part.is_hand());
        }
        for row in &STRENGTH_SCHEMA {
            assert!(row.part != BodyPartId::Hips && !row.part.is_hand());
        }
    }

    #[test]
    fn every_rotated_joint_has_a_strength_slot() {
        let driven: HashSet<BodyPartId> = STRENGTH_SCHEMA.iter().map(|r| r.part).collect();
        for row in &ROTATION_SCHEMA {
            assert!(driven.contains(&row.part), "{}", row.part.label());
        }
    }

    #[test]
    fn handicap_marks_exactly_the_arm_joints() {
        let handicapped: HashSet<BodyPartId> = STRENGTH_SCHEMA
            .iter()
            .filter(|r| r.arm_handicap)
            .map(|r| r.part)
            .collect();
        let arms = HashSet::from([
            BodyPartId::ArmL,
            BodyPartId::ForearmL,
            BodyPartId::ArmR,
            BodyPartId::ForearmR,
        ]);
        assert_eq!(handicapped, arms);
    }
}
