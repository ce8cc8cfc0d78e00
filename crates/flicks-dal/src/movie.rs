use crate::error::{Error, Result};
use crate::SharedMovies;
use garde::Validate;
use serde::{Deserialize, Serialize};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Closed set of genres; serde rejects anything outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Drama,
    Action,
    Adventure,
    Comedy,
    Crime,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Drama => "Drama",
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
        }
    }

    /// Query-parameter match is case-insensitive.
    pub fn matches(&self, query: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(query)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: i32,
    pub rate: f32,
    pub poster: String,
    pub genre: Vec<Genre>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct CreateMovie {
    #[garde(length(min = 1))]
    title: String,
    #[garde(range(min = 1))]
    year: i32,
    #[garde(length(min = 1))]
    director: String,
    #[garde(range(min = 1))]
    duration: i32,
    #[serde(default)]
    #[garde(range(min = 0.0, max = 10.0))]
    rate: f32,
    #[garde(url)]
    poster: String,
    #[garde(skip)]
    genre: Vec<Genre>,
}

/// Partial payload for PATCH; absent fields keep their stored value,
/// present fields must satisfy the same rules as on create.
#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
pub struct UpdateMovie {
    #[garde(length(min = 1))]
    title: Option<String>,
    #[garde(range(min = 1))]
    year: Option<i32>,
    #[garde(length(min = 1))]
    director: Option<String>,
    #[garde(range(min = 1))]
    duration: Option<i32>,
    #[garde(range(min = 0.0, max = 10.0))]
    rate: Option<f32>,
    #[garde(url)]
    poster: Option<String>,
    #[garde(skip)]
    genre: Option<Vec<Genre>>,
}

#[derive(Clone)]
pub struct MovieRepository {
    movies: SharedMovies,
}

impl MovieRepository {
    pub fn new(movies: SharedMovies) -> Self {
        Self { movies }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Movie>>> {
        self.movies.read().map_err(|_| Error::StorePoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Movie>>> {
        self.movies.write().map_err(|_| Error::StorePoisoned)
    }

    pub fn list(&self, genre: Option<&str>) -> Result<Vec<Movie>> {
        let movies = self.read()?;
        let records = match genre {
            // an empty parameter means no filter, same as an absent one
            Some(genre) if !genre.is_empty() => movies
                .iter()
                .filter(|movie| movie.genre.iter().any(|g| g.matches(genre)))
                .cloned()
                .collect(),
            _ => movies.clone(),
        };
        Ok(records)
    }

    pub fn get(&self, id: Uuid) -> Result<Movie> {
        self.read()?
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))
    }

    pub fn create(&self, payload: CreateMovie) -> Result<Movie> {
        let movie = Movie {
            id: Uuid::new_v4(),
            title: payload.title,
            year: payload.year,
            director: payload.director,
            duration: payload.duration,
            rate: payload.rate,
            poster: payload.poster,
            genre: payload.genre,
        };
        self.write()?.push(movie.clone());
        Ok(movie)
    }

    pub fn update(&self, id: Uuid, payload: UpdateMovie) -> Result<Movie> {
        let mut movies = self.write()?;
        let movie = movies
            .iter_mut()
            .find(|movie| movie.id == id)
            .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))?;

        if let Some(title) = payload.title {
            movie.title = title;
        }
        if let Some(year) = payload.year {
            movie.year = year;
        }
        if let Some(director) = payload.director {
            movie.director = director;
        }
        if let Some(duration) = payload.duration {
            movie.duration = duration;
        }
        if let Some(rate) = payload.rate {
            movie.rate = rate;
        }
        if let Some(poster) = payload.poster {
            movie.poster = poster;
        }
        if let Some(genre) = payload.genre {
            movie.genre = genre;
        }

        Ok(movie.clone())
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut movies = self.write()?;
        let index = movies
            .iter()
            .position(|movie| movie.id == id)
            .ok_or_else(|| Error::RecordNotFound("Movie".to_string()))?;
        movies.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_store;
    use serde_json::json;

    fn sample_create(title: &str, genre: Vec<Genre>) -> CreateMovie {
        CreateMovie {
            title: title.to_string(),
            year: 1999,
            director: "Someone".to_string(),
            duration: 120,
            rate: 7.5,
            poster: "https://example.com/poster.jpg".to_string(),
            genre,
        }
    }

    fn repository() -> MovieRepository {
        MovieRepository::new(new_store(Vec::new()))
    }

    #[test]
    fn create_assigns_fresh_id_and_keeps_fields() {
        let repo = repository();
        let created = repo
            .create(sample_create("The Matrix", vec![Genre::Action, Genre::SciFi]))
            .unwrap();

        assert_eq!(created.title, "The Matrix");
        assert_eq!(created.year, 1999);
        assert_eq!(created.genre, vec![Genre::Action, Genre::SciFi]);

        let fetched = repo.get(created.id).unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, created.title);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let repo = repository();
        let err = repo.get(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn list_filters_by_genre_case_insensitively() {
        let repo = repository();
        repo.create(sample_create("Heat", vec![Genre::Action, Genre::Crime]))
            .unwrap();
        repo.create(sample_create("Her", vec![Genre::Drama, Genre::Romance]))
            .unwrap();
        repo.create(sample_create("Alien", vec![Genre::SciFi]))
            .unwrap();

        let all = repo.list(None).unwrap();
        assert_eq!(all.len(), 3);

        let action = repo.list(Some("aCtIoN")).unwrap();
        assert_eq!(action.len(), 1);
        assert_eq!(action[0].title, "Heat");

        let scifi = repo.list(Some("sci-fi")).unwrap();
        assert_eq!(scifi.len(), 1);
        assert_eq!(scifi[0].title, "Alien");

        let none = repo.list(Some("Western")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn list_with_empty_genre_behaves_like_no_filter() {
        let repo = repository();
        repo.create(sample_create("Heat", vec![Genre::Action, Genre::Crime]))
            .unwrap();
        repo.create(sample_create("Her", vec![Genre::Drama, Genre::Romance]))
            .unwrap();

        let all = repo.list(Some("")).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn update_merges_only_present_fields() {
        let repo = repository();
        let created = repo
            .create(sample_create("Old Title", vec![Genre::Drama]))
            .unwrap();

        let patch: UpdateMovie =
            serde_json::from_value(json!({"title": "New Title", "rate": 9.0})).unwrap();
        let updated = repo.update(created.id, patch).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.rate, 9.0);
        // untouched fields survive
        assert_eq!(updated.year, created.year);
        assert_eq!(updated.director, created.director);
        assert_eq!(updated.genre, created.genre);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let repo = repository();
        let err = repo.update(Uuid::new_v4(), UpdateMovie::default()).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn delete_removes_record_and_second_delete_fails() {
        let repo = repository();
        let created = repo.create(sample_create("Gone", vec![Genre::Drama])).unwrap();

        repo.delete(created.id).unwrap();
        assert!(repo.list(None).unwrap().is_empty());

        let err = repo.delete(created.id).unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(_)));
    }

    #[test]
    fn create_payload_validation() {
        let valid: CreateMovie = serde_json::from_value(json!({
            "title": "Dune",
            "year": 2021,
            "director": "Denis Villeneuve",
            "duration": 155,
            "poster": "https://example.com/dune.jpg",
            "genre": ["Sci-Fi", "Adventure"]
        }))
        .unwrap();
        assert!(valid.validate().is_ok());
        // rate was absent, serde default applies
        assert_eq!(valid.rate, 0.0);

        let bad: CreateMovie = serde_json::from_value(json!({
            "title": "",
            "year": 0,
            "director": "X",
            "duration": 100,
            "rate": 11.0,
            "poster": "not a url",
            "genre": []
        }))
        .unwrap();
        let report = bad.validate().unwrap_err();
        let failed: Vec<String> = report
            .iter()
            .map(|(path, _)| path.to_string())
            .collect();
        assert!(failed.contains(&"title".to_string()));
        assert!(failed.contains(&"year".to_string()));
        assert!(failed.contains(&"rate".to_string()));
        assert!(failed.contains(&"poster".to_string()));
    }

    #[test]
    fn partial_payload_validates_only_present_fields() {
        let empty: UpdateMovie = serde_json::from_value(json!({})).unwrap();
        assert!(empty.validate().is_ok());

        let bad_rate: UpdateMovie = serde_json::from_value(json!({"rate": 10.5})).unwrap();
        assert!(bad_rate.validate().is_err());
    }

    #[test]
    fn unknown_genre_is_rejected_by_serde() {
        let result: std::result::Result<Vec<Genre>, _> =
            serde_json::from_value(json!(["Action", "Horror"]));
        assert!(result.is_err());
    }
}
