use reqwest::Url;

/// One quality variant listed in a master playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub bandwidth: u64,
    pub uri: String,
}

/// A segment still present in the live window, ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    /// Media sequence number from the playlist
    pub sequence: u64,
    pub url: Url,
}

impl SegmentDescriptor {
    pub fn new(sequence: u64, url: Url) -> Self {
        Self { sequence, url }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSegment {
    pub sequence: u64,
    pub data: Vec<u8>,
}

/// Transport stream bytes of a whole live window, ordered by ascending sequence.
///
/// Segments are concatenated as-is. Callers must only feed segments that are
/// continuous at the transport stream level, nothing here validates that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledStream {
    data: Vec<u8>,
    segments: usize,
}

impl AssembledStream {
    /// Stable-sorts `segments` by sequence and concatenates their data.
    pub fn from_segments(mut segments: Vec<FetchedSegment>) -> Self {
        segments.sort_by_key(|segment| segment.sequence);

        let total = segments.iter().map(|segment| segment.data.len()).sum();
        let mut data = Vec::with_capacity(total);
        for segment in &segments {
            data.extend_from_slice(&segment.data);
        }

        Self {
            data,
            segments: segments.len(),
        }
    }

    /// Number of segments that were concatenated.
    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
