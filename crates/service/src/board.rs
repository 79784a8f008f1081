use std::sync::Arc;

use models::{ad, validate_ad_fields, validate_user_fields, Ad, User};
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::filter::AdFilter;
use crate::storage::{AdRepository, InMemoryAdStore, InMemoryUserStore, UserRepository};

/// Board wired to the volatile stores, as run by the server.
pub type InMemoryBoard = AdBoardService<InMemoryAdStore, InMemoryUserStore>;

/// Ads board business service, independent of any transport.
///
/// Validates input, checks that the acting user authored the ad it mutates and
/// translates store outcomes into [`ServiceError`]. Every call is synchronous and
/// safe to issue from any number of threads at once.
pub struct AdBoardService<A: AdRepository, U: UserRepository> {
    ads: Arc<A>,
    users: Arc<U>,
}

impl InMemoryBoard {
    /// Board backed by fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryAdStore::new()), Arc::new(InMemoryUserStore::new()))
    }
}

impl<A: AdRepository, U: UserRepository> AdBoardService<A, U> {
    pub fn new(ads: Arc<A>, users: Arc<U>) -> Self { Self { ads, users } }

    /// Create an unpublished ad.
    ///
    /// The author id is not checked against the user store.
    ///
    /// # Examples
    /// ```
    /// use service::board::InMemoryBoard;
    /// let board = InMemoryBoard::in_memory();
    /// let ad = board.create_ad("hello", "world", 0).unwrap();
    /// assert_eq!(ad.id, 0);
    /// assert!(!ad.published);
    /// ```
    #[instrument(skip(self, title, text))]
    pub fn create_ad(&self, title: &str, text: &str, author_id: i64) -> Result<Ad, ServiceError> {
        validate_ad_fields(title, text)?;
        let ad = self.ads.create(title, text, author_id)?;
        info!(ad_id = ad.id, author_id, "ad_created");
        Ok(ad)
    }

    /// Publish or unpublish an ad. Only its author may do so.
    #[instrument(skip(self))]
    pub fn change_ad_status(&self, ad_id: i64, actor_id: i64, published: bool) -> Result<Ad, ServiceError> {
        self.authorize(ad_id, actor_id)?;
        let ad = self.ads.update_status(ad_id, published)?;
        info!(ad_id, published, "ad_status_changed");
        Ok(ad)
    }

    /// Replace title and text. Authorization is checked before validation.
    #[instrument(skip(self, title, text))]
    pub fn update_ad(&self, ad_id: i64, actor_id: i64, title: &str, text: &str) -> Result<Ad, ServiceError> {
        self.authorize(ad_id, actor_id)?;
        validate_ad_fields(title, text)?;
        let ad = self.ads.update_content(ad_id, title, text)?;
        info!(ad_id, "ad_updated");
        Ok(ad)
    }

    #[instrument(skip(self))]
    pub fn delete_ad(&self, ad_id: i64, actor_id: i64) -> Result<(), ServiceError> {
        self.authorize(ad_id, actor_id)?;
        self.ads.delete(ad_id)?;
        info!(ad_id, "ad_deleted");
        Ok(())
    }

    pub fn get_ad(&self, id: i64) -> Result<Ad, ServiceError> {
        debug!(ad_id = id, "get_ad");
        Ok(self.ads.get(id)?)
    }

    /// Look an ad up by exact title.
    ///
    /// The title goes through the ad title rule first, so an empty or over-long
    /// title is a validation error rather than a miss.
    pub fn get_ad_by_title(&self, title: &str) -> Result<Ad, ServiceError> {
        ad::validate_title(title)?;
        debug!(%title, "get_ad_by_title");
        Ok(self.ads.get_by_title(title)?)
    }

    pub fn list_published_ads(&self) -> Result<Vec<Ad>, ServiceError> {
        Ok(self.ads.list_published()?)
    }

    /// Published ads for which every predicate in `filter` holds.
    ///
    /// Order follows store iteration and is not stable between calls.
    #[instrument(skip(self, filter), fields(predicates = filter.predicates().len()))]
    pub fn list_ads_by_filter(&self, filter: &AdFilter) -> Result<Vec<Ad>, ServiceError> {
        let ads: Vec<Ad> = self
            .ads
            .list_published()?
            .into_iter()
            .filter(|ad| filter.matches(ad))
            .collect();
        debug!(count = ads.len(), "ads_filtered");
        Ok(ads)
    }

    /// Register a user. A taken email is reported as a validation error.
    #[instrument(skip(self, nickname, email))]
    pub fn create_user(&self, nickname: &str, email: &str) -> Result<User, ServiceError> {
        validate_user_fields(nickname, email)?;
        let user = self.users.create(nickname, email)?;
        info!(user_id = user.id, "user_created");
        Ok(user)
    }

    pub fn get_user(&self, id: i64) -> Result<User, ServiceError> {
        Ok(self.users.get(id)?)
    }

    /// Remove a user. Their ads stay on the board.
    #[instrument(skip(self))]
    pub fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        self.users.delete(id)?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }

    pub fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list_all()?)
    }

    fn authorize(&self, ad_id: i64, actor_id: i64) -> Result<Ad, ServiceError> {
        let ad = self.ads.get(ad_id)?;
        if ad.author_id != actor_id {
            warn!(ad_id, actor_id, author_id = ad.author_id, "actor is not the ad author");
            return Err(ServiceError::Unauthorized("user has no rights".into()));
        }
        Ok(ad)
    }
}

impl<A: AdRepository, U: UserRepository> Clone for AdBoardService<A, U> {
    fn clone(&self) -> Self {
        Self { ads: Arc::clone(&self.ads), users: Arc::clone(&self.users) }
    }
}
