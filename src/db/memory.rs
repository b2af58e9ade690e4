use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::common::BackendError;
use crate::models::{
    AccessToken, AuthUser, Contact, ContactUpsert, Credentials, Event, Photo, PhotoInput,
    PhotoUpdate, Profile, ProfileUpsert, Session, Show, ShowInput, ShowType,
};
use crate::services::{AuthProvider, ObjectStore};

use super::{ShowQuery, SiteStore};

const MEMORY_BASE_URL: &str = "https://memory.invalid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Tables {
    profile: Option<Profile>,
    contact: Option<Contact>,
    show_types: Vec<ShowType>,
    shows: Vec<Show>,
    photos: Vec<Photo>,
    events: Vec<Event>,
    objects: BTreeMap<String, StoredObject>,
    accounts: Vec<Credentials>,
    sessions: HashMap<String, AuthUser>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        let max_seen = self
            .shows
            .iter()
            .map(|s| s.id)
            .chain(self.photos.iter().map(|p| p.id))
            .max()
            .unwrap_or(0);
        self.last_id = self.last_id.max(max_seen) + 1;
        self.last_id
    }

    fn event_name(&self, event_id: Option<i64>) -> Option<String> {
        let id = event_id?;
        self.events.iter().find(|e| e.id == id).map(|e| e.name.clone())
    }
}

/// In-process stand-in for the hosted service.
///
/// Implements the same three seams as [`Backend`](super::Backend) over
/// mutex-guarded tables. Reads and writes can be switched to fail, which is
/// how the fallback and error-notification paths are exercised.
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.lock().profile = Some(profile);
        self
    }

    pub fn with_contact(self, contact: Contact) -> Self {
        self.lock().contact = Some(contact);
        self
    }

    pub fn with_show_types(self, show_types: Vec<ShowType>) -> Self {
        self.lock().show_types = show_types;
        self
    }

    pub fn with_shows(self, shows: Vec<Show>) -> Self {
        self.lock().shows = shows;
        self
    }

    pub fn with_photos(self, photos: Vec<Photo>) -> Self {
        self.lock().photos = photos;
        self
    }

    pub fn with_events(self, events: Vec<Event>) -> Self {
        self.lock().events = events;
        self
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.lock().accounts.push(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        });
        self
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    pub fn contact(&self) -> Option<Contact> {
        self.lock().contact.clone()
    }

    pub fn shows(&self) -> Vec<Show> {
        self.lock().shows.clone()
    }

    pub fn photos(&self) -> Vec<Photo> {
        self.lock().photos.clone()
    }

    pub fn object(&self, bucket: &str, name: &str) -> Option<StoredObject> {
        self.lock().objects.get(&format!("{bucket}/{name}")).cloned()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn active_sessions(&self) -> usize {
        self.lock().sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) -> Result<MutexGuard<'_, Tables>, BackendError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("reads are switched off".into()));
        }
        Ok(self.lock())
    }

    fn write(&self) -> Result<MutexGuard<'_, Tables>, BackendError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("writes are switched off".into()));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl SiteStore for MemoryBackend {
    async fn get_profile(&self) -> Result<Option<Profile>, BackendError> {
        Ok(self.read()?.profile.clone())
    }

    async fn upsert_profile(
        &self,
        _token: &AccessToken,
        data: &ProfileUpsert,
    ) -> Result<(), BackendError> {
        let mut tables = self.write()?;
        data.apply_to(tables.profile.get_or_insert_with(Profile::default));
        Ok(())
    }

    async fn get_contact(&self) -> Result<Option<Contact>, BackendError> {
        Ok(self.read()?.contact.clone())
    }

    async fn upsert_contact(
        &self,
        _token: &AccessToken,
        data: &ContactUpsert,
    ) -> Result<(), BackendError> {
        let mut tables = self.write()?;
        data.apply_to(tables.contact.get_or_insert_with(Contact::default));
        Ok(())
    }

    async fn list_show_types(&self) -> Result<Vec<ShowType>, BackendError> {
        let mut types = self.read()?.show_types.clone();
        types.sort_by_key(|t| t.id);
        Ok(types)
    }

    async fn list_shows(&self, query: &ShowQuery) -> Result<Vec<Show>, BackendError> {
        let mut shows: Vec<Show> = self
            .read()?
            .shows
            .iter()
            .filter(|s| query.after.map_or(true, |after| s.starts_on() > after))
            .cloned()
            .collect();
        shows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        if let Some(limit) = query.limit {
            shows.truncate(limit);
        }
        Ok(shows)
    }

    async fn create_show(
        &self,
        _token: &AccessToken,
        input: &ShowInput,
    ) -> Result<i64, BackendError> {
        let mut tables = self.write()?;
        let id = tables.next_id();
        tables.shows.push(Show::from_input(id, input, Utc::now()));
        Ok(id)
    }

    async fn update_show(
        &self,
        _token: &AccessToken,
        id: i64,
        input: &ShowInput,
    ) -> Result<(), BackendError> {
        let mut tables = self.write()?;
        if let Some(show) = tables.shows.iter_mut().find(|s| s.id == id) {
            let created_at = show.created_at.unwrap_or_else(Utc::now);
            *show = Show::from_input(id, input, created_at);
        }
        Ok(())
    }

    async fn delete_show(&self, _token: &AccessToken, id: i64) -> Result<(), BackendError> {
        self.write()?.shows.retain(|s| s.id != id);
        Ok(())
    }

    async fn list_photos(&self, limit: Option<usize>) -> Result<Vec<Photo>, BackendError> {
        let mut photos = self.read()?.photos.clone();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            photos.truncate(limit);
        }
        Ok(photos)
    }

    async fn create_photo(
        &self,
        _token: &AccessToken,
        input: &PhotoInput,
    ) -> Result<(), BackendError> {
        let mut tables = self.write()?;
        let id = tables.next_id();
        let event_name = tables.event_name(input.event_id);
        tables.photos.push(Photo {
            id,
            url: input.url.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            event_id: input.event_id,
            event_name,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_photo(
        &self,
        _token: &AccessToken,
        id: i64,
        data: &PhotoUpdate,
    ) -> Result<(), BackendError> {
        let mut tables = self.write()?;
        let event_name = tables.event_name(data.event_id);
        if let Some(photo) = tables.photos.iter_mut().find(|p| p.id == id) {
            photo.title = data.title.clone();
            photo.description = data.description.clone();
            photo.event_id = data.event_id;
            photo.event_name = event_name;
        }
        Ok(())
    }

    async fn delete_photos(&self, _token: &AccessToken, ids: &[i64]) -> Result<(), BackendError> {
        self.write()?.photos.retain(|p| !ids.contains(&p.id));
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>, BackendError> {
        let mut events = self.read()?.events.clone();
        events.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(events)
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let mut tables = self.lock();
        let known = tables
            .accounts
            .iter()
            .any(|a| a.email == credentials.email && a.password == credentials.password);
        if !known {
            return Err(BackendError::Auth("Invalid login credentials".into()));
        }

        let token = Uuid::new_v4().to_string();
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: Some(credentials.email.clone()),
        };
        tables.sessions.insert(token.clone(), user.clone());

        Ok(Session {
            access_token: AccessToken::new(token),
            expires_in: Some(3600),
            user,
        })
    }

    async fn current_user(&self, token: &AccessToken) -> Result<Option<AuthUser>, BackendError> {
        Ok(self.lock().sessions.get(token.as_str()).cloned())
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), BackendError> {
        self.lock().sessions.remove(token.as_str());
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(
        &self,
        _token: &AccessToken,
        bucket: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError> {
        self.write()?.objects.insert(
            format!("{bucket}/{name}"),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("{MEMORY_BASE_URL}/storage/v1/object/public/{bucket}/{name}")
    }
}
