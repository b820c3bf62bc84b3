/// Detection counts per keypoint record and gain comparison between runs.
pub mod summary;
