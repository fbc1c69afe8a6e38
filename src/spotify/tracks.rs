use reqwest::{StatusCode, header::AUTHORIZATION};

use crate::{
    error::{Error, Result},
    spotify::{READ_OK, SpotifyClient, expect_status},
    types::{CurrentlyPlayingResponse, NowPlaying, TopTracksResponse, TrackSummary},
};

impl SpotifyClient {
    /// Retrieves the user's ten most played tracks.
    ///
    /// Calls `GET /me/top/tracks?limit=10` and reshapes every item into a
    /// [`TrackSummary`] with artist names flattened to strings.
    ///
    /// # Arguments
    ///
    /// * `authorization` - Full `Authorization` header value (`Bearer ...`)
    ///
    /// # Errors
    ///
    /// Any status other than 200 is returned as [`Error::Upstream`].
    pub async fn top_tracks(&self, authorization: &str) -> Result<Vec<TrackSummary>> {
        let res = self
            .http
            .get(self.url("/me/top/tracks"))
            .query(&[("limit", "10")])
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.into()))?;

        let res = expect_status(res, READ_OK).await.map_err(Error::Upstream)?;
        let body: TopTracksResponse = res.json().await.map_err(|e| Error::Upstream(e.into()))?;

        Ok(body.items.into_iter().map(TrackSummary::from).collect())
    }

    /// Retrieves the track currently playing on the user's account.
    ///
    /// Returns `Ok(None)` when Spotify answers 204, or when the payload has
    /// no track item (an ad or a local file that cannot be resolved).
    pub async fn now_playing(&self, authorization: &str) -> Result<Option<NowPlaying>> {
        let res = self
            .http
            .get(self.url("/me/player/currently-playing"))
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.into()))?;

        let res = expect_status(res, &[StatusCode::OK, StatusCode::NO_CONTENT])
            .await
            .map_err(Error::Upstream)?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body: CurrentlyPlayingResponse =
            res.json().await.map_err(|e| Error::Upstream(e.into()))?;

        Ok(body.item.map(|track| NowPlaying {
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            is_playing: body.is_playing,
        }))
    }
}
