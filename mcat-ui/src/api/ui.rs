//! UI Routes - HTML pages for the mcat-ui web interface
//!
//! Vanilla HTML/CSS/JS served inline; the page pulls the catalog from
//! /api/songs and streams audio through /api/songs/:guid/stream.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(library_page))
}

/// Root page - recent songs with thumbnails and playback controls
async fn library_page() -> impl IntoResponse {
    Html(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>mcat - Music Library</title>
    <style>
        body { font-family: sans-serif; background: #121212; color: white; padding: 20px; max-width: 800px; margin: 0 auto; }
        h1 { border-bottom: 2px solid #0066cc; padding-bottom: 10px; }
        .song-card { display: flex; align-items: center; background: #1e1e1e; margin-bottom: 10px; padding: 10px; border-radius: 8px; }
        .song-card img { width: 60px; height: 60px; border-radius: 4px; margin-right: 15px; object-fit: cover; background: #333; }
        .info { flex-grow: 1; }
        .info h4 { margin: 0; }
        .info p { margin: 5px 0 0; color: #b3b3b3; font-size: 0.9em; }
        audio { height: 30px; }
        .empty { color: #b3b3b3; }
    </style>
</head>
<body>
    <h1>Recent Songs</h1>
    <div id="library"><p class="empty">Loading...</p></div>
    <script>
        function thumbUrl(song) {
            if (!song.thumbnail_path) return null;
            const name = song.thumbnail_path.split(/[\\/]/).pop();
            return '/thumbs/' + encodeURIComponent(name);
        }

        async function loadLibrary() {
            const container = document.getElementById('library');
            const response = await fetch('/api/songs');
            if (!response.ok) {
                container.innerHTML = '<p class="empty">Failed to load the catalog.</p>';
                return;
            }
            const songs = await response.json();
            if (songs.length === 0) {
                container.innerHTML = '<p class="empty">No songs yet. Run mcat-ix first.</p>';
                return;
            }

            container.innerHTML = '';
            for (const song of songs.slice(0, 10)) {
                const card = document.createElement('div');
                card.className = 'song-card';

                const img = document.createElement('img');
                const thumb = thumbUrl(song);
                if (thumb) img.src = thumb;
                img.alt = 'Cover';
                card.appendChild(img);

                const info = document.createElement('div');
                info.className = 'info';
                const title = document.createElement('h4');
                title.textContent = song.title;
                const line = document.createElement('p');
                line.textContent = song.artist + ' - ' + song.album;
                info.appendChild(title);
                info.appendChild(line);
                card.appendChild(info);

                const audio = document.createElement('audio');
                audio.controls = true;
                audio.src = '/api/songs/' + song.guid + '/stream';
                card.appendChild(audio);

                container.appendChild(card);
            }
        }

        loadLibrary();
    </script>
</body>
</html>
"#,
    )
}
