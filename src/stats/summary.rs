use std::io::{BufRead, BufReader, BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{PoseVizError, PoseVizResult};
use crate::keypoints::model::{Keypoint, KeypointFrame};
use crate::keypoints::source::KeypointSource;

/// Pose points count as detected above this confidence.
pub const POSE_THRESHOLD: f32 = 0.05;
/// Face points count as detected above this confidence.
pub const FACE_THRESHOLD: f32 = 0.4;
/// Hand points count as detected above this confidence.
pub const HAND_THRESHOLD: f32 = 0.2;

/// Column names of a statistics file, in order.
pub const COLUMNS: [&str; 6] = [
    "people",
    "people_points",
    "faces",
    "face_points",
    "hands",
    "hand_points",
];

/// Detection counts for one keypoint record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectionCounts {
    /// People in the record.
    pub people: u64,
    /// Pose points above [`POSE_THRESHOLD`], over all people.
    pub people_points: u64,
    /// People with at least one face point above [`FACE_THRESHOLD`].
    pub faces: u64,
    /// Face points above [`FACE_THRESHOLD`].
    pub face_points: u64,
    /// Hands (two per person) with at least one point above [`HAND_THRESHOLD`].
    pub hands: u64,
    /// Hand points above [`HAND_THRESHOLD`], both hands.
    pub hand_points: u64,
}

impl DetectionCounts {
    /// Count detections in `frame`.
    pub fn from_frame(frame: &KeypointFrame) -> Self {
        let mut c = Self {
            people: frame.people.len() as u64,
            ..Self::default()
        };
        for person in &frame.people {
            c.people_points += count_above(&person.pose, POSE_THRESHOLD);

            let face = count_above(&person.face, FACE_THRESHOLD);
            c.face_points += face;
            c.faces += u64::from(face > 0);

            for hand in [&person.hand_left, &person.hand_right] {
                let n = count_above(hand, HAND_THRESHOLD);
                c.hand_points += n;
                c.hands += u64::from(n > 0);
            }
        }
        c
    }

    /// Values in [`COLUMNS`] order.
    pub fn to_array(self) -> [u64; 6] {
        [
            self.people,
            self.people_points,
            self.faces,
            self.face_points,
            self.hands,
            self.hand_points,
        ]
    }

    /// Build from values in [`COLUMNS`] order.
    pub fn from_array(v: [u64; 6]) -> Self {
        Self {
            people: v[0],
            people_points: v[1],
            faces: v[2],
            face_points: v[3],
            hands: v[4],
            hand_points: v[5],
        }
    }
}

fn count_above(points: &[Keypoint], threshold: f32) -> u64 {
    points.iter().filter(|k| k.confidence > threshold).count() as u64
}

/// Count detections for every record of `source`, in entry order.
#[tracing::instrument(skip(source), fields(location = %source.location().display()))]
pub fn collect_counts(source: &mut KeypointSource) -> PoseVizResult<Vec<DetectionCounts>> {
    let names = source.names().to_vec();
    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        let frame = source.open_frame(name)?;
        rows.push(DetectionCounts::from_frame(&frame));
    }
    tracing::info!(records = rows.len(), "detections counted");
    Ok(rows)
}

/// Write `rows` as a tab-separated file with a [`COLUMNS`] header.
pub fn write_tsv(path: &Path, rows: &[DetectionCounts]) -> PoseVizResult<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;
    let mut w = BufWriter::new(file);
    let write = |w: &mut BufWriter<std::fs::File>| -> std::io::Result<()> {
        writeln!(w, "{}", COLUMNS.join("\t"))?;
        for row in rows {
            let cells: Vec<String> = row.to_array().iter().map(u64::to_string).collect();
            writeln!(w, "{}", cells.join("\t"))?;
        }
        w.flush()
    };
    write(&mut w).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Read a file written by [`write_tsv`]. The header line is skipped; blank lines are ignored.
pub fn read_tsv(path: &Path) -> PoseVizResult<Vec<DetectionCounts>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
    let mut rows = Vec::new();
    for (n, line) in BufReader::new(file).lines().enumerate().skip(1) {
        let line = line.with_context(|| format!("failed to read '{}'", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(&line).map_err(|msg| {
            PoseVizError::parse(format!("{}:{}: {msg}", path.display(), n + 1))
        })?);
    }
    Ok(rows)
}

fn parse_row(line: &str) -> Result<DetectionCounts, String> {
    let mut v = [0u64; 6];
    let mut cells = line.split('\t');
    for (slot, name) in v.iter_mut().zip(COLUMNS) {
        let cell = cells
            .next()
            .ok_or_else(|| format!("missing column '{name}'"))?;
        *slot = cell
            .trim()
            .parse()
            .map_err(|e| format!("column '{name}': {e}"))?;
    }
    if cells.next().is_some() {
        return Err(format!("expected {} columns", COLUMNS.len()));
    }
    Ok(DetectionCounts::from_array(v))
}

/// Per-column gain of one statistics table over another.
#[derive(Clone, Debug, PartialEq)]
pub struct GainReport {
    /// Rows compared (the shorter table's length).
    pub rows: usize,
    /// `sum(large) / sum(small)` per column; 0 where the small sum is 0.
    pub total_gain: [f64; 6],
    /// Mean of `large / small` per column over all rows; rows with a 0 small value add 0.
    pub average_gain: [f64; 6],
}

/// Compare `large` against `small`, truncating the longer table to the shorter one.
pub fn compare(small: &[DetectionCounts], large: &[DetectionCounts]) -> GainReport {
    if small.len() != large.len() {
        tracing::warn!(
            small = small.len(),
            large = large.len(),
            "statistics tables differ in length; truncating to the shorter"
        );
    }
    let rows = small.len().min(large.len());
    let (small, large) = (&small[..rows], &large[..rows]);

    let mut sum_small = [0f64; 6];
    let mut sum_large = [0f64; 6];
    let mut sum_ratio = [0f64; 6];
    for (s, l) in small.iter().zip(large) {
        let (s, l) = (s.to_array(), l.to_array());
        for c in 0..COLUMNS.len() {
            let (s, l) = (s[c] as f64, l[c] as f64);
            sum_small[c] += s;
            sum_large[c] += l;
            sum_ratio[c] += ratio(l, s);
        }
    }

    let mut total_gain = [0f64; 6];
    let mut average_gain = [0f64; 6];
    for c in 0..COLUMNS.len() {
        total_gain[c] = ratio(sum_large[c], sum_small[c]);
        if rows > 0 {
            average_gain[c] = sum_ratio[c] / rows as f64;
        }
    }
    GainReport {
        rows,
        total_gain,
        average_gain,
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

impl std::fmt::Display for GainReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rows\t{}", self.rows)?;
        writeln!(f, "column\ttotal_gain\taverage_gain")?;
        for (c, name) in COLUMNS.iter().enumerate() {
            writeln!(
                f,
                "{name}\t{:.4}\t{:.4}",
                self.total_gain[c], self.average_gain[c]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stats/summary.rs"]
mod tests;
