use serde::Serialize;

/// Deep links that hand a stream URL to external players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayLinks {
    pub vlc: String,
    pub potplayer: String,
    pub iina: String,
    pub mpv: String,
    pub nplayer: String,
    pub mx: String,
}

/// Build the per-player URL map. Each player has its own scheme quirks: IINA
/// and mpv take a percent-encoded URL, nPlayer prefixes the scheme verbatim,
/// and MX Player uses an Android intent with the display title embedded.
pub fn play_links(stream_url: &str, file_name: &str) -> PlayLinks {
    let encoded_url = urlencoding::encode(stream_url);
    let encoded_name = urlencoding::encode(file_name);

    PlayLinks {
        vlc: format!("vlc://{stream_url}"),
        potplayer: format!("potplayer://{stream_url}"),
        iina: format!("iina://weblink?url={encoded_url}"),
        mpv: format!("mpv://{encoded_url}"),
        nplayer: format!("nplayer-{stream_url}"),
        mx: format!(
            "intent:{stream_url}#Intent;package=com.mxtech.videoplayer.ad;S.title={encoded_name};end"
        ),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
