use reqwest::header::AUTHORIZATION;

use crate::{
    error::{Error, Result},
    spotify::{READ_OK, SpotifyClient, expect_status},
    types::FollowedArtistsResponse,
};

impl SpotifyClient {
    /// Retrieves the names of artists the user follows.
    ///
    /// Calls `GET /me/following?type=artist` once and returns the first page
    /// as Spotify delivers it. Cursor pagination is not followed.
    ///
    /// # Errors
    ///
    /// Any status other than 200 is returned as [`Error::Upstream`].
    pub async fn followed_artists(&self, authorization: &str) -> Result<Vec<String>> {
        let res = self
            .http
            .get(self.url("/me/following"))
            .query(&[("type", "artist")])
            .header(AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.into()))?;

        let res = expect_status(res, READ_OK).await.map_err(Error::Upstream)?;
        let body: FollowedArtistsResponse =
            res.json().await.map_err(|e| Error::Upstream(e.into()))?;

        Ok(body.artists.items.into_iter().map(|a| a.name).collect())
    }
}
