//! Deletion verification
//!
//! Deletes on the Mode API are eventually consistent: a resource can still be
//! readable for a while after its DELETE returned 200. Before a handler drops
//! a resource from state it polls the resource URL until the API reports it
//! gone (404) or soft deleted.
//!
//! One upstream bug is handled here: a GET on a freshly deleted collection
//! (`.../api/<workspace>/spaces/<token>`) can answer 403 instead of 404. For
//! that URL shape only, the verifier lists the parent collections instead; if
//! the listing succeeds the caller evidently still has access and the 403 is
//! taken to mean "gone". Other URL shapes treat 403 as a hard error, since the
//! bug has only been seen on collections. Re-check this against the API when
//! upgrading.

use regex::Regex;
use reqwest::StatusCode;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use super::client::{decode_response, error_from_response, ApiRequest, Client};
use super::common::{ApiQueryParams, ResourceState};
use super::error::ApiError;
use crate::framework::Context;

#[derive(Debug, Clone)]
pub struct DeletionConfig {
    /// Delay between polls; the first poll happens one tick after start
    pub tick: Duration,
    /// Overall budget before giving up
    pub timeout: Duration,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
pub enum DeletionState {
    Polling,
    ConfirmedDeleted,
    TimedOut,
    Errored(ApiError),
}

fn nested_collection_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(https?://[^/]+/api/[^/]+/spaces)/[^/?#]+$")
            .expect("nested collection pattern is valid")
    })
}

/// Whether `url` addresses a single collection, i.e. `.../api/<ws>/spaces/<token>`
pub fn is_nested_collection_item(url: &str) -> bool {
    nested_collection_pattern().is_match(url)
}

/// Parent listing (`.../spaces?filter=all`) for a collection item URL
pub fn collection_listing_url(url: &str) -> Option<String> {
    let captures = nested_collection_pattern().captures(url)?;
    let query = ApiQueryParams::new().add("filter", "all").to_query_string();
    Some(format!("{}{}", &captures[1], query))
}

impl Client {
    /// Poll `resource_url` until the API confirms the resource is gone.
    ///
    /// Returns `Ok(())` on 404 or a `soft_deleted` state. Keeps polling while
    /// the resource reads back with any other state. Gives up with
    /// [`ApiError::DeletionTimeout`] once the budget is spent, and fails
    /// immediately on any other status.
    pub async fn check_deletion(&self, ctx: &Context, resource_url: &str) -> Result<(), ApiError> {
        let config = self.deletion_config();

        let timeout = time::sleep(config.timeout);
        tokio::pin!(timeout);

        // interval panics on a zero period
        let tick = config.tick.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(time::Instant::now() + tick, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = DeletionState::Polling;
        let mut ticks: u32 = 0;

        loop {
            match state {
                DeletionState::Polling => {}
                DeletionState::ConfirmedDeleted => {
                    tracing::info!("Deletion of {} verified after {} poll(s)", resource_url, ticks);
                    return Ok(());
                }
                DeletionState::TimedOut => {
                    tracing::warn!(
                        "Deletion of {} not confirmed after {} poll(s)",
                        resource_url,
                        ticks
                    );
                    return Err(ApiError::DeletionTimeout {
                        url: resource_url.to_string(),
                        timeout: config.timeout,
                    });
                }
                DeletionState::Errored(err) => return Err(err),
            }

            state = tokio::select! {
                biased;
                _ = ctx.cancelled() => {
                    return Err(ApiError::Cancelled { url: resource_url.to_string() });
                }
                _ = &mut timeout => DeletionState::TimedOut,
                // a running poll is still bounded by the budget and cancellation
                polled = async {
                    ticker.tick().await;
                    ticks += 1;
                    self.poll_deletion(ctx, resource_url).await
                } => polled,
            };
        }
    }

    /// One poll: a single GET, no rate-limit retry
    async fn poll_deletion(&self, ctx: &Context, resource_url: &str) -> DeletionState {
        let response = match self.send_once(ctx, &ApiRequest::get(resource_url)).await {
            Ok(response) => response,
            Err(err) => return DeletionState::Errored(err),
        };

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!("Deletion verified: {} not found (404)", resource_url);
                DeletionState::ConfirmedDeleted
            }
            StatusCode::OK => match decode_response::<ResourceState>(ctx, resource_url, response).await {
                Ok(body) if body.is_soft_deleted() => {
                    tracing::debug!("Deletion verified: {} is soft deleted", resource_url);
                    DeletionState::ConfirmedDeleted
                }
                Ok(body) => {
                    tracing::debug!(
                        "Resource {} still present (state {:?}), retrying",
                        resource_url,
                        body.state
                    );
                    DeletionState::Polling
                }
                Err(err) => DeletionState::Errored(err),
            },
            StatusCode::FORBIDDEN if is_nested_collection_item(resource_url) => {
                drop(response);
                match self.listing_confirms_access(ctx, resource_url, false).await {
                    Ok(()) => DeletionState::ConfirmedDeleted,
                    Err(err) => DeletionState::Errored(err),
                }
            }
            status => DeletionState::Errored(ApiError::DeletionUnconfirmed {
                url: resource_url.to_string(),
                status: status.as_u16(),
            }),
        }
    }

    /// Workaround for the 403-after-delete bug on collections.
    ///
    /// `Ok(())` means the parent listing answered 200 and the 403 can be read
    /// as "gone". Any other URL shape, or a failed listing, is an error. The
    /// listing goes through the rate-limit retry loop.
    pub async fn confirm_access_after_forbidden(
        &self,
        ctx: &Context,
        resource_url: &str,
    ) -> Result<(), ApiError> {
        self.listing_confirms_access(ctx, resource_url, true).await
    }

    /// Shared by the read path (`retry`) and the verifier, whose polls are
    /// single sends bounded by its own budget
    async fn listing_confirms_access(
        &self,
        ctx: &Context,
        resource_url: &str,
        retry: bool,
    ) -> Result<(), ApiError> {
        let Some(listing_url) = collection_listing_url(resource_url) else {
            return Err(ApiError::Status {
                url: resource_url.to_string(),
                status: StatusCode::FORBIDDEN.as_u16(),
                message: "access denied".to_string(),
            });
        };

        tracing::debug!(
            "{} answered 403, checking access through {}",
            resource_url,
            listing_url
        );

        let request = ApiRequest::get(&listing_url);
        let response = if retry {
            self.execute(ctx, &request).await?
        } else {
            self.send_once(ctx, &request).await?
        };
        match response.status() {
            StatusCode::OK => Ok(()),
            _ => Err(error_from_response(ctx, &listing_url, response).await),
        }
    }
}
