pub const ARTIST_1_ID: &str = "4tZwfgrHOc3mvqYlEYSvVi";
pub const ARTIST_2_ID: &str = "0oSGxfWSnnOXhD2fKuz2Gy";
pub const ARTIST_3_ID: &str = "6vWDO969PvNqNYHIOW5v0m";

pub const ALBUM_1_ID: &str = "2noRn2Aes5aoNVsU6iWThc";
pub const ALBUM_2_ID: &str = "1ATL5GLyefJaxhQzSPVrLX";
pub const SINGLE_1_ID: &str = "5Z9KJZvQzH6PFmb8SNkxuk";

pub const TRACK_1_ID: &str = "3n3Ppam7vgaVa1iaRUc9Lp";
pub const TRACK_2_ID: &str = "7ouMYWpwJ422jRcDASZB7P";
pub const TRACK_3_ID: &str = "0VjIjW4GlUZAMYd2vXMi3b";
pub const TRACK_4_ID: &str = "1301WleyT98MSxVHPZCA6M";

pub const SENDER_EMAIL: &str = "digest@example.com";
pub const SUBJECT: &str = "Spotify New Releases";
