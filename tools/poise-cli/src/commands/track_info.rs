//! Summarize a landmark track.

use std::collections::BTreeMap;
use std::path::PathBuf;

use poise_media::TrackLandmarkProvider;
use poise_signal_model::landmark::FaceTopology;
use poise_signal_model::track::LandmarkTrack;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let provider = TrackLandmarkProvider::load(&path)?;
    let track = provider.track();
    let header = &track.header;

    println!("Track: {}", path.display());
    println!("  Schema: {}", header.schema_version);
    println!("  Topology: {}", header.topology);
    if let Some(ref detector) = header.detector {
        println!("  Detector: {detector}");
    }
    if let (Some(w), Some(h)) = (header.width, header.height) {
        println!("  Frame size: {w}x{h}");
    }
    println!();

    let face_frames = track.records.iter().filter(|r| !r.faces.is_empty()).count();
    println!("Records: {}", track.records.len());
    println!("  With a face: {face_frames}");
    match (track.records.first(), track.last_frame()) {
        (Some(first), Some(last)) => println!("  Frame span: {}..={}", first.frame, last),
        _ => println!("  Frame span: (empty)"),
    }

    // Points per face, counted across every face in the track.
    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    for face in track.records.iter().flat_map(|r| &r.faces) {
        *sizes.entry(face.len()).or_default() += 1;
    }
    for (points, faces) in &sizes {
        println!("  {faces} face(s) with {points} points");
    }

    match provider.topology() {
        Ok(topology) => {
            let short = unscorable_faces(track, &topology);
            if short > 0 {
                println!(
                    "[WARN] {short} face(s) have fewer than {} points and will be skipped",
                    topology.min_points()
                );
            }
        }
        Err(e) => println!("[WARN] {e}"),
    }

    Ok(())
}

/// Faces too short to hold both eye subsets of `topology`.
fn unscorable_faces(track: &LandmarkTrack, topology: &FaceTopology) -> usize {
    track
        .records
        .iter()
        .flat_map(|r| &r.faces)
        .filter(|face| face.len() < topology.min_points())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_signal_model::landmark::{LandmarkSet, Point2D};
    use poise_signal_model::track::TrackRecord;

    fn face(points: usize) -> LandmarkSet {
        LandmarkSet::new(vec![Point2D::CENTER; points])
    }

    #[test]
    fn test_only_faces_missing_eye_points_are_unscorable() {
        let track = LandmarkTrack {
            records: vec![
                TrackRecord {
                    frame: 0,
                    faces: vec![face(68), face(60)],
                },
                TrackRecord {
                    frame: 1,
                    faces: vec![face(48), face(47), face(20)],
                },
            ],
            ..Default::default()
        };

        // 60- and 48-point faces still carry indices 36..=47.
        assert_eq!(unscorable_faces(&track, &FaceTopology::IBUG_68), 2);
    }
}
