use crate::keypoints::model::Region;

/// Frames wider than this many pixels are drawn with the high-resolution stroke table.
pub const HD_WIDTH_THRESHOLD: u32 = 1300;

/// Body layout produced by the pose estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SkeletonFormat {
    /// 18-joint COCO body layout (17 limbs).
    #[default]
    Coco18,
    /// 25-joint BODY_25 layout (adds mid-hip and feet).
    Body25,
}

/// Stroke table selector derived from the frame width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionClass {
    /// Width at or below [`HD_WIDTH_THRESHOLD`].
    Standard,
    /// Width above [`HD_WIDTH_THRESHOLD`].
    High,
}

impl ResolutionClass {
    /// Classify a frame by its pixel width.
    pub fn from_width(width: u32) -> Self {
        if width > HD_WIDTH_THRESHOLD {
            Self::High
        } else {
            Self::Standard
        }
    }

    /// Extra thickness added to a region's line thickness when drawing joint markers.
    pub fn marker_extra(self) -> u32 {
        match self {
            Self::Standard => 3,
            Self::High => 12,
        }
    }
}

/// Connection graph and per-connection colors of one region.
///
/// Colors are stored in the channel order of decoded frames (blue, green, red).
#[derive(Clone, Copy, Debug)]
pub struct Topology {
    /// `(joint_a, joint_b)` pairs; a joint may appear in several pairs.
    pub connections: &'static [(usize, usize)],
    /// One color per connection, parallel to `connections`.
    pub colors: &'static [[u8; 3]],
}

impl Topology {
    /// Iterate connections with their colors.
    pub fn edges(&self) -> impl Iterator<Item = ((usize, usize), [u8; 3])> + '_ {
        self.connections
            .iter()
            .copied()
            .zip(self.colors.iter().copied())
    }
}

/// Connections and colors for `region` under `format`.
///
/// Face and hand layouts do not depend on the body format.
pub fn connections_for(format: SkeletonFormat, region: Region) -> Topology {
    match (region, format) {
        (Region::Pose, SkeletonFormat::Coco18) => Topology {
            connections: &COCO18_CONNECTIONS,
            colors: &COCO18_COLORS,
        },
        (Region::Pose, SkeletonFormat::Body25) => Topology {
            connections: &BODY25_CONNECTIONS,
            colors: &BODY25_COLORS,
        },
        (Region::Face, _) => Topology {
            connections: &FACE_CONNECTIONS,
            colors: &FACE_COLORS,
        },
        (Region::HandLeft | Region::HandRight, _) => Topology {
            connections: &HAND_CONNECTIONS,
            colors: &HAND_COLORS,
        },
    }
}

/// Line thickness for `region` at `class`.
pub fn thickness_for(class: ResolutionClass, region: Region) -> u32 {
    let table = match class {
        ResolutionClass::Standard => &THICKNESS_STANDARD,
        ResolutionClass::High => &THICKNESS_HIGH,
    };
    table[region.index()]
}

// Indexed by `Region::index`: pose, face, left hand, right hand.
const THICKNESS_STANDARD: [u32; 4] = [2, 1, 2, 2];
const THICKNESS_HIGH: [u32; 4] = [8, 4, 6, 6];

static COCO18_CONNECTIONS: [(usize, usize); 17] = [
    (1, 2),
    (1, 5),
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (1, 8),
    (8, 9),
    (9, 10),
    (1, 11),
    (11, 12),
    (12, 13),
    (1, 0),
    (0, 14),
    (14, 16),
    (0, 15),
    (15, 17),
];

static COCO18_COLORS: [[u8; 3]; 17] = [
    [255, 0, 85],
    [255, 0, 0],
    [255, 85, 0],
    [255, 170, 0],
    [255, 255, 0],
    [170, 255, 0],
    [85, 255, 0],
    [0, 255, 0],
    [0, 255, 85],
    [0, 255, 170],
    [0, 255, 255],
    [0, 170, 255],
    [0, 85, 255],
    [0, 0, 255],
    [255, 0, 170],
    [170, 0, 255],
    [255, 0, 255],
];

static BODY25_CONNECTIONS: [(usize, usize); 24] = [
    (1, 8),
    (1, 2),
    (1, 5),
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (8, 9),
    (9, 10),
    (10, 11),
    (8, 12),
    (12, 13),
    (13, 14),
    (1, 0),
    (0, 15),
    (15, 17),
    (0, 16),
    (16, 18),
    (14, 19),
    (19, 20),
    (14, 21),
    (11, 22),
    (22, 23),
    (11, 24),
];

static BODY25_COLORS: [[u8; 3]; 24] = [
    [255, 0, 85],
    [255, 0, 0],
    [255, 85, 0],
    [255, 170, 0],
    [255, 255, 0],
    [170, 255, 0],
    [85, 255, 0],
    [0, 255, 0],
    [255, 0, 0],
    [0, 255, 85],
    [0, 255, 170],
    [0, 255, 255],
    [0, 170, 255],
    [0, 85, 255],
    [0, 0, 255],
    [255, 0, 170],
    [170, 0, 255],
    [255, 0, 255],
    [85, 0, 255],
    [0, 0, 255],
    [0, 0, 255],
    [0, 0, 255],
    [0, 255, 255],
    [0, 255, 255],
];

// Jaw line, brows, nose bridge, nostrils, closed eye and lip loops.
static FACE_CONNECTIONS: [(usize, usize); 63] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (8, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (12, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (17, 18),
    (18, 19),
    (19, 20),
    (20, 21),
    (22, 23),
    (23, 24),
    (24, 25),
    (25, 26),
    (27, 28),
    (28, 29),
    (29, 30),
    (31, 32),
    (32, 33),
    (33, 34),
    (34, 35),
    (36, 37),
    (37, 38),
    (38, 39),
    (39, 40),
    (40, 41),
    (41, 36),
    (42, 43),
    (43, 44),
    (44, 45),
    (45, 46),
    (46, 47),
    (47, 42),
    (48, 49),
    (49, 50),
    (50, 51),
    (51, 52),
    (52, 53),
    (53, 54),
    (54, 55),
    (55, 56),
    (56, 57),
    (57, 58),
    (58, 59),
    (59, 48),
    (60, 61),
    (61, 62),
    (62, 63),
    (63, 64),
    (64, 65),
    (65, 66),
    (66, 67),
    (67, 60),
];

static FACE_COLORS: [[u8; 3]; 63] = [[255, 255, 255]; 63];

static HAND_CONNECTIONS: [(usize, usize); 20] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (0, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (0, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
];

static HAND_COLORS: [[u8; 3]; 20] = [
    [100, 100, 100],
    [100, 0, 0],
    [150, 0, 0],
    [200, 0, 0],
    [255, 0, 0],
    [100, 100, 0],
    [150, 150, 0],
    [200, 200, 0],
    [255, 255, 0],
    [0, 100, 50],
    [0, 150, 75],
    [0, 200, 100],
    [0, 255, 125],
    [0, 50, 100],
    [0, 75, 150],
    [0, 100, 200],
    [0, 125, 255],
    [100, 0, 100],
    [150, 0, 150],
    [200, 0, 200],
];

#[cfg(test)]
#[path = "../../tests/unit/skeleton/topology.rs"]
mod tests;
