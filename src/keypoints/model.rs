use serde::Deserialize;

use crate::foundation::error::{PoseVizError, PoseVizResult};

/// One anatomical landmark in source-frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Horizontal pixel coordinate (not normalized).
    pub x: f32,
    /// Vertical pixel coordinate (not normalized).
    pub y: f32,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f32,
}

/// One of the four landmark groups carried per person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Body joints.
    Pose,
    /// Face landmarks.
    Face,
    /// Left hand joints.
    HandLeft,
    /// Right hand joints.
    HandRight,
}

impl Region {
    /// All regions in drawing order.
    pub const ALL: [Region; 4] = [
        Region::Pose,
        Region::Face,
        Region::HandLeft,
        Region::HandRight,
    ];

    /// Position of the region in [`Region::ALL`] and in the thickness tables.
    pub fn index(self) -> usize {
        match self {
            Region::Pose => 0,
            Region::Face => 1,
            Region::HandLeft => 2,
            Region::HandRight => 3,
        }
    }

    /// Field name of this region in a keypoint record.
    pub fn json_key(self) -> &'static str {
        match self {
            Region::Pose => "pose_keypoints_2d",
            Region::Face => "face_keypoints_2d",
            Region::HandLeft => "hand_left_keypoints_2d",
            Region::HandRight => "hand_right_keypoints_2d",
        }
    }
}

/// Keypoints of a single detected person, grouped by region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    /// Body joints.
    pub pose: Vec<Keypoint>,
    /// Face landmarks.
    pub face: Vec<Keypoint>,
    /// Left hand joints.
    pub hand_left: Vec<Keypoint>,
    /// Right hand joints.
    pub hand_right: Vec<Keypoint>,
}

impl Person {
    /// Borrow the keypoints of `region`.
    pub fn region(&self, region: Region) -> &[Keypoint] {
        match region {
            Region::Pose => &self.pose,
            Region::Face => &self.face,
            Region::HandLeft => &self.hand_left,
            Region::HandRight => &self.hand_right,
        }
    }

    /// Look up joint `idx` of `region`; `None` when the record has fewer joints.
    pub fn joint(&self, region: Region, idx: usize) -> Option<Keypoint> {
        self.region(region).get(idx).copied()
    }
}

/// All people detected in one video frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeypointFrame {
    /// People in record order.
    pub people: Vec<Person>,
}

#[derive(Deserialize)]
struct RawFrame {
    people: Vec<RawPerson>,
}

// Face and hand arrays are absent when the detector ran with those models disabled.
#[derive(Deserialize)]
struct RawPerson {
    pose_keypoints_2d: Option<Vec<f32>>,
    #[serde(default)]
    face_keypoints_2d: Vec<f32>,
    #[serde(default)]
    hand_left_keypoints_2d: Vec<f32>,
    #[serde(default)]
    hand_right_keypoints_2d: Vec<f32>,
}

impl KeypointFrame {
    /// Decode one keypoint record.
    ///
    /// Undecodable bytes and a missing `people` field are [`PoseVizError::Parse`]; arrays whose
    /// length is not a multiple of 3, or a person without `pose_keypoints_2d`, are
    /// [`PoseVizError::Format`].
    pub fn from_json_slice(bytes: &[u8]) -> PoseVizResult<Self> {
        let raw: RawFrame = serde_json::from_slice(bytes)
            .map_err(|e| PoseVizError::parse(format!("invalid keypoint record: {e}")))?;

        let mut people = Vec::with_capacity(raw.people.len());
        for (i, p) in raw.people.into_iter().enumerate() {
            let pose = p.pose_keypoints_2d.ok_or_else(|| {
                PoseVizError::format(format!(
                    "person {i} has no '{}' array",
                    Region::Pose.json_key()
                ))
            })?;
            people.push(Person {
                pose: triples(&pose, Region::Pose, i)?,
                face: triples(&p.face_keypoints_2d, Region::Face, i)?,
                hand_left: triples(&p.hand_left_keypoints_2d, Region::HandLeft, i)?,
                hand_right: triples(&p.hand_right_keypoints_2d, Region::HandRight, i)?,
            });
        }
        Ok(Self { people })
    }
}

fn triples(flat: &[f32], region: Region, person: usize) -> PoseVizResult<Vec<Keypoint>> {
    if !flat.len().is_multiple_of(3) {
        return Err(PoseVizError::format(format!(
            "person {person} '{}' has {} values, expected a multiple of 3",
            region.json_key(),
            flat.len()
        )));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| Keypoint {
            x: c[0],
            y: c[1],
            confidence: c[2],
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/keypoints/model.rs"]
mod tests;
