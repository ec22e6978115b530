use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestArtist {
    pub artist_id: String,
    pub name: String,
    pub popularity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestTrack {
    pub track_id: String,
    pub name: String,
    pub track_number: i64,
    pub preview_url: Option<String>,
    /// Track artists that are not artists of the album.
    pub featured_artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestAlbum {
    pub album_id: String,
    pub name: String,
    pub release_date: String,
    pub image_url: Option<String>,
    /// Most popular first.
    pub artists: Vec<DigestArtist>,
    /// In track number order.
    pub tracks: Vec<DigestTrack>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSingle {
    pub track_id: String,
    pub name: String,
    pub preview_url: Option<String>,
    pub release_date: Option<String>,
    pub image_url: Option<String>,
    pub artists: Vec<DigestArtist>,
    pub genres: Vec<String>,
}

/// Everything collected on one date, most popular releases first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub date: NaiveDate,
    pub albums: Vec<DigestAlbum>,
    pub singles: Vec<DigestSingle>,
    pub has_new_albums: bool,
    pub has_new_singles: bool,
}

impl Digest {
    pub fn new(date: NaiveDate, albums: Vec<DigestAlbum>, singles: Vec<DigestSingle>) -> Self {
        Self {
            date,
            has_new_albums: !albums.is_empty(),
            has_new_singles: !singles.is_empty(),
            albums,
            singles,
        }
    }

    /// True when there is nothing worth sending.
    pub fn is_empty(&self) -> bool {
        !self.has_new_albums && !self.has_new_singles
    }
}
