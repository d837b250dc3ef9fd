//! Audio streaming
//!
//! Serves a song's MP3 file with byte-range support so browser audio
//! elements can seek.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::{
    fs::File,
    io::{AsyncSeekExt, BufReader, SeekFrom},
};
use tokio_util::io::ReaderStream;
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use mcat_common::db::songs;

const STREAM_BUFFER_SIZE: usize = 4096 * 16;

/// A parsed `Range: bytes=start-end` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: Option<u64>,
    end_inclusive: Option<u64>,
}

impl ByteRange {
    pub fn new(start_inclusive: Option<u64>, end_inclusive: Option<u64>) -> ByteRange {
        ByteRange {
            start_inclusive,
            end_inclusive,
        }
    }

    fn parse<S: AsRef<str>>(s: S) -> Option<ByteRange> {
        let v = s.as_ref();
        if !v.starts_with("bytes=") {
            return None;
        }

        let v = &v[6..];
        let parts: Vec<&str> = v.split('-').collect();
        if parts.len() != 2 {
            return None;
        }

        Some(ByteRange {
            start_inclusive: parts[0].parse::<u64>().ok(),
            end_inclusive: parts[1].parse::<u64>().ok(),
        })
    }

    fn from_headers(headers: &HeaderMap) -> Option<ByteRange> {
        headers
            .get(header::RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(ByteRange::parse)
    }
}

/// GET /api/songs/:guid/stream
pub async fn stream_song(
    State(state): State<AppState>,
    Path(guid): Path<Uuid>,
    headers: HeaderMap,
) -> Response {
    let song = match songs::load_song(&state.db, guid).await {
        Ok(Some(song)) => song,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    debug!("Streaming song: {}", song.record.title);

    // The file may have moved since the last scan
    let mut file = match File::open(&song.record.full_path).await {
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
        Ok(file) => file,
    };

    let byte_range = ByteRange::from_headers(&headers);

    let mut start_served = 0;
    if let Some(start) = byte_range.and_then(|r| r.start_inclusive) {
        if file.seek(SeekFrom::Start(start)).await.is_err() {
            return StatusCode::BAD_REQUEST.into_response();
        }
        start_served = start;
    }

    let file_length = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let chunk_size = match byte_range {
        None => file_length,
        Some(ByteRange {
            start_inclusive: None,
            end_inclusive: None,
        }) => file_length,
        Some(ByteRange {
            start_inclusive: None,
            end_inclusive: Some(end),
        }) => end,
        Some(ByteRange {
            start_inclusive: Some(start),
            end_inclusive: None,
        }) => file_length - start,
        Some(ByteRange {
            start_inclusive: Some(start),
            end_inclusive: Some(end),
        }) => end - start + 1,
    };
    let status_code = match byte_range {
        None
        | Some(ByteRange {
            start_inclusive: None,
            end_inclusive: None,
        }) => StatusCode::OK,
        _ => StatusCode::PARTIAL_CONTENT,
    };

    let file_reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, file);
    let stream = ReaderStream::with_capacity(file_reader, STREAM_BUFFER_SIZE);

    let body = Body::from_stream(stream);

    Response::builder()
        .status(status_code)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(header::ACCEPT_RANGES, "bytes")
        .header(
            header::CONTENT_RANGE,
            format!(
                "bytes {}-{}/{}",
                start_served,
                start_served + chunk_size.saturating_sub(1),
                file_length
            ),
        )
        .header(header::CONTENT_LENGTH, chunk_size)
        .body(body)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::ByteRange;

    fn assert_byte_range(s: &str, a: Option<u64>, b: Option<u64>) {
        assert_eq!(ByteRange::parse(s), Some(ByteRange::new(a, b)));
    }

    fn assert_no_byte_range(s: &str) {
        assert_eq!(ByteRange::parse(s), None);
    }

    #[test]
    fn parses_byte_range() {
        assert_no_byte_range("asd");
        assert_no_byte_range("bytes=");
        assert_byte_range("bytes=-", None, None);
        assert_byte_range("bytes=11-", Some(11), None);
        assert_byte_range("bytes=-111", None, Some(111));
        assert_byte_range("bytes=11-111", Some(11), Some(111));
    }
}
