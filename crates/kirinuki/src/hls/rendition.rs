use crate::segment::Rendition;

/// Picks the rendition with the highest bandwidth.
///
/// Only a strictly greater bandwidth replaces the current pick, so among
/// equal maxima the first one listed wins.
pub fn select_rendition(renditions: &[Rendition]) -> Option<&Rendition> {
    let mut renditions = renditions.iter();
    let mut best = renditions.next()?;
    for rendition in renditions {
        if rendition.bandwidth > best.bandwidth {
            best = rendition;
        }
    }
    Some(best)
}
