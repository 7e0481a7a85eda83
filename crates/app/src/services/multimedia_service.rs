//! Multimedia service — uploads, notes, and the file lifecycle of attachments.

use tripmap_domain::error::{NotFoundError, TripMapError};
use tripmap_domain::id::{MarkerId, MultimediaId};
use tripmap_domain::multimedia::{self, FileUpload, Multimedia, NewMultimedia, NotesUpdate};
use tripmap_domain::pagination::{Page, PageRequest};

use crate::ports::{FileStore, MarkerRepository, MultimediaRepository};

const ENTITY: &str = "Multimedia entry";

/// Application service for multimedia entries.
///
/// Needs read access to markers to verify that uploads and notes reference
/// an existing marker, and a [`FileStore`] for the uploaded bytes.
pub struct MultimediaService<R, M, F> {
    repo: R,
    markers: M,
    files: F,
}

impl<R, M, F> MultimediaService<R, M, F>
where
    R: MultimediaRepository,
    M: MarkerRepository,
    F: FileStore,
{
    /// Create a new service backed by the given ports.
    pub fn new(repo: R, markers: M, files: F) -> Self {
        Self {
            repo,
            markers,
            files,
        }
    }

    /// One page of entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_multimedia(
        &self,
        page: PageRequest,
    ) -> Result<Page<Multimedia>, TripMapError> {
        self.repo.list(page).await
    }

    /// Every entry attached to `marker_id`, newest first. An unknown marker
    /// yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_by_marker(&self, marker_id: MarkerId) -> Result<Vec<Multimedia>, TripMapError> {
        self.repo.find_by_marker(marker_id).await
    }

    /// Look up an entry by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no entry with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_multimedia(&self, id: MultimediaId) -> Result<Multimedia, TripMapError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::record(ENTITY, id).into())
    }

    /// Store each uploaded file and insert one row per file.
    ///
    /// The whole batch is validated before anything is written. Files are
    /// written one at a time; a failure on file N leaves files 1..N-1 (and
    /// their rows) in place.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::Validation`] for an empty, oversized or
    /// disallowed batch, [`TripMapError::NotFound`] when the marker does not
    /// exist, or a storage error from the file store or repository.
    #[tracing::instrument(skip(self, files, notes), fields(file_count = files.len()))]
    pub async fn upload_files(
        &self,
        marker_id: MarkerId,
        files: Vec<FileUpload>,
        notes: Option<String>,
    ) -> Result<Vec<Multimedia>, TripMapError> {
        multimedia::validate_batch(&files)?;
        self.ensure_marker(marker_id).await?;

        let notes = notes.filter(|s| !s.is_empty());
        let mut created = Vec::with_capacity(files.len());
        for file in files {
            let filepath = self.files.save(&file).await?;
            let entry = NewMultimedia {
                media_type: file.media_type(),
                marker_id,
                filesize: Some(i64::try_from(file.size()).unwrap_or(i64::MAX)),
                filename: Some(file.original_name),
                filepath: Some(filepath),
                mimetype: Some(file.content_type),
                notes: notes.clone(),
            };
            let row = self.repo.create(entry).await?;
            tracing::info!(multimedia_id = %row.id, media_type = %row.media_type, "file stored");
            created.push(row);
        }
        Ok(created)
    }

    /// Attach a text note to an existing marker.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when the marker does not exist, or
    /// a storage error from the repository.
    #[tracing::instrument(skip(self, notes))]
    pub async fn create_note(
        &self,
        marker_id: MarkerId,
        notes: String,
    ) -> Result<Multimedia, TripMapError> {
        self.ensure_marker(marker_id).await?;
        self.repo.create(NewMultimedia::note(marker_id, notes)).await
    }

    /// Insert a row as given, without checking that the marker exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self, entry), fields(media_type = %entry.media_type))]
    pub async fn create_unchecked(&self, entry: NewMultimedia) -> Result<Multimedia, TripMapError> {
        self.repo.create(entry).await
    }

    /// Change the notes of an entry; every other field is immutable.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no entry with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_notes(
        &self,
        id: MultimediaId,
        update: NotesUpdate,
    ) -> Result<(), TripMapError> {
        let stored = self.get_multimedia(id).await?;
        if self.repo.update_notes(id, update.apply(stored.notes)).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }

    /// Delete an entry and its file, if any.
    ///
    /// A file that cannot be removed (already gone, or otherwise) does not
    /// prevent the row from being deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::NotFound`] when no entry with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_multimedia(&self, id: MultimediaId) -> Result<(), TripMapError> {
        let stored = self.get_multimedia(id).await?;

        if let Some(filepath) = stored.filepath.as_deref() {
            if let Err(err) = self.files.remove(filepath).await {
                tracing::warn!(error = %err, filepath, "could not remove attachment file");
            }
        }

        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(NotFoundError::record(ENTITY, id).into())
        }
    }

    async fn ensure_marker(&self, marker_id: MarkerId) -> Result<(), TripMapError> {
        match self.markers.get_by_id(marker_id).await? {
            Some(_) => Ok(()),
            None => Err(NotFoundError::record("Marker", marker_id).into()),
        }
    }
}
