use url::{Url, form_urlencoded};

use crate::{
    error::{Error, Result},
    types::{ExchangeTokenRequest, PlayRequest, TrackSummary, TrackTableRow},
};

/// Pulls the `code` query parameter out of a redirected callback URL.
///
/// Returns `None` if the URL does not parse or carries no non-empty code.
pub fn extract_code(redirected_url: &str) -> Option<String> {
    let url = Url::parse(redirected_url.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

/// Reads the redirected URL out of an exchange-token request body.
///
/// The body is either JSON `{"redirect_url": "..."}` or the URL as plain text.
pub fn parse_redirect_body(body: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::BadRequest("request body is not valid UTF-8".to_string()))?
        .trim();

    if text.starts_with('{') {
        let request: ExchangeTokenRequest = serde_json::from_str(text)
            .map_err(|e| Error::BadRequest(format!("invalid JSON body: {e}")))?;
        return Ok(request.redirect_url);
    }
    if text.is_empty() {
        return Err(Error::BadRequest("request body is empty".to_string()));
    }
    Ok(text.to_string())
}

/// Parameters accepted by the play routes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlayParams {
    pub device_id: Option<String>,
    pub request: PlayRequest,
}

/// Parses `device_id`, `context_uri`, `uris` and `position_ms` from a raw
/// query string. `uris` may repeat; unknown keys are ignored.
pub fn parse_play_query(query: Option<&str>) -> Result<PlayParams> {
    let mut params = PlayParams::default();
    let Some(query) = query else {
        return Ok(params);
    };

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "device_id" => params.device_id = Some(value.into_owned()),
            "context_uri" => params.request.context_uri = Some(value.into_owned()),
            "uris" => params
                .request
                .uris
                .get_or_insert_with(Vec::new)
                .push(value.into_owned()),
            "position_ms" => {
                let position = value.parse::<u64>().map_err(|_| {
                    Error::BadRequest(format!("position_ms must be a non-negative integer, got {value:?}"))
                })?;
                params.request.position_ms = Some(position);
            }
            _ => {}
        }
    }

    Ok(params)
}

/// `"<name> by <artist>, <artist>"`
pub fn format_track_line(track: &TrackSummary) -> String {
    format!("{} by {}", track.name, track.artists.join(", "))
}

pub fn track_table_rows(tracks: &[TrackSummary]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .map(|t| TrackTableRow {
            name: t.name.clone(),
            artists: t.artists.join(", "),
        })
        .collect()
}
