use reqwest::{RequestBuilder, header::AUTHORIZATION};

use crate::{
    error::{Error, Result},
    spotify::{PLAYBACK_OK, SpotifyClient, expect_status},
    types::PlayRequest,
};

impl SpotifyClient {
    /// Pauses playback on `device_id`, or on the active device if `None`.
    ///
    /// Accepts 200, 202 and 204. A 404 (no active device) is returned as
    /// [`Error::Upstream`] like every other status.
    pub async fn pause(&self, authorization: &str, device_id: Option<&str>) -> Result<()> {
        let req = self
            .http
            .put(self.url("/me/player/pause"))
            .header(AUTHORIZATION, authorization);

        send_playback(with_device(req, device_id)).await
    }

    /// Starts or resumes playback on `device_id`, or on the active device.
    ///
    /// The JSON body only carries the fields set in `request`; an empty
    /// request resumes the current context.
    pub async fn play(
        &self,
        authorization: &str,
        device_id: Option<&str>,
        request: &PlayRequest,
    ) -> Result<()> {
        let req = self
            .http
            .put(self.url("/me/player/play"))
            .header(AUTHORIZATION, authorization)
            .json(request);

        send_playback(with_device(req, device_id)).await
    }
}

fn with_device(req: RequestBuilder, device_id: Option<&str>) -> RequestBuilder {
    match device_id.filter(|id| !id.is_empty()) {
        Some(id) => req.query(&[("device_id", id)]),
        None => req,
    }
}

async fn send_playback(req: RequestBuilder) -> Result<()> {
    let res = req.send().await.map_err(|e| Error::Upstream(e.into()))?;
    expect_status(res, PLAYBACK_OK)
        .await
        .map_err(Error::Upstream)?;
    Ok(())
}
