use link_extract::{ExtractConfig, ExtractError, Extraction, LinkExtractor, MediaType, SourceKind};
use mockito::Matcher;

const POST_URL: &str = "https://www.instagram.com/p/ABC123/";
const REEL_URL: &str = "https://www.instagram.com/reel/ABC123/";
const EMBED_PATH: &str = "/p/ABC123/embed/captioned/";

fn test_config(server: &mockito::Server) -> ExtractConfig {
    ExtractConfig {
        instagram_base_url: server.url(),
        oembed_endpoint: format!("{}/oembed/", server.url()),
        retry_delay_ms: 0,
        ..ExtractConfig::default()
    }
}

fn create_embed_html(caption_html: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <body>
            <div class="Embed">
                <img class="EmbeddedMediaImage" alt="post" src="https://cdn.example.com/thumb.jpg?a=1&amp;b=2">
                <div class="Caption">
                    <a class="CaptionUsername" href="https://www.instagram.com/chef_jo/">chef_jo</a>
                    {caption_html}
                    <div class="CaptionComments">View all 12 comments</div>
                </div>
            </div>
        </body>
        </html>
        "#
    )
}

fn extract(server: &mockito::Server, url: &str) -> Result<Extraction, ExtractError> {
    LinkExtractor::new(test_config(server))?.extract(url, Some(SourceKind::Instagram))
}

#[test]
fn test_caption_from_embed_page() {
    let mut server = mockito::Server::new();
    let embed = server
        .mock("GET", EMBED_PATH)
        .match_header("user-agent", Matcher::Regex("Googlebot".to_string()))
        .match_header("accept", "text/html")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(create_embed_html(
            "<br>Creamy tomato pasta &#x1F35D;<br />1 cup pasta<br/>2 tomatoes &amp; basil",
        ))
        .expect(1)
        .create();
    let oembed = server.mock("GET", "/oembed/").expect(0).create();

    let Extraction::Instagram(post) = extract(&server, POST_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    embed.assert();
    oembed.assert();
    assert_eq!(post.shortcode, "ABC123");
    assert_eq!(post.url, POST_URL);
    assert_eq!(
        post.caption,
        "Creamy tomato pasta \u{1F35D}\n1 cup pasta\n2 tomatoes & basil"
    );
    assert_eq!(post.username.as_deref(), Some("chef_jo"));
    assert_eq!(post.media_type, MediaType::Image);
    assert_eq!(
        post.thumbnail.as_deref(),
        Some("https://cdn.example.com/thumb.jpg?a=1&b=2")
    );
    assert!(post.note.is_none());
    assert!(post.title.is_none());
}

#[test]
fn test_reel_is_video() {
    let mut server = mockito::Server::new();
    let _embed = server
        .mock("GET", EMBED_PATH)
        .with_status(200)
        .with_body(create_embed_html("Quick reel"))
        .create();

    let Extraction::Instagram(post) = extract(&server, REEL_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    assert_eq!(post.caption, "Quick reel");
    assert_eq!(post.media_type, MediaType::Video);
}

#[test]
fn test_video_flag_in_embed_json() {
    let mut server = mockito::Server::new();
    let body = r#"<script>{"shortcode_media":{"is_video":true,"owner":{"username":"videochef"},
        "edge_media_to_caption":{"edges":[{"node":{"text":"Watch this\nLine two"}}]}}}</script>"#;
    let _embed = server
        .mock("GET", EMBED_PATH)
        .with_status(200)
        .with_body(body)
        .create();

    let Extraction::Instagram(post) = extract(&server, POST_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    assert_eq!(post.caption, "Watch this\nLine two");
    assert_eq!(post.username.as_deref(), Some("videochef"));
    assert_eq!(post.media_type, MediaType::Video);
    assert!(post.thumbnail.is_none());
}

#[test]
fn test_oembed_fallback_after_retry() {
    let mut server = mockito::Server::new();
    let embed = server
        .mock("GET", EMBED_PATH)
        .with_status(200)
        .with_body("<html><body>Log in to see this post</body></html>")
        .expect(2)
        .create();
    let oembed = server
        .mock("GET", "/oembed/")
        .match_query(Matcher::UrlEncoded("url".to_string(), POST_URL.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"title": "Pasta night", "author_name": "chef_jo",
                "thumbnail_url": "https://cdn.example.com/oembed.jpg", "version": "1.0"}"#,
        )
        .expect(1)
        .create();

    let Extraction::Instagram(post) = extract(&server, POST_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    embed.assert();
    oembed.assert();
    assert_eq!(post.caption, "");
    assert_eq!(post.title.as_deref(), Some("Pasta night"));
    assert_eq!(post.username.as_deref(), Some("chef_jo"));
    assert_eq!(
        post.thumbnail.as_deref(),
        Some("https://cdn.example.com/oembed.jpg")
    );
    assert_eq!(post.media_type, MediaType::Image);
    assert!(post.note.unwrap().starts_with("Embed rate-limited"));
}

#[test]
fn test_everything_fails_yields_note() {
    let mut server = mockito::Server::new();
    let embed = server
        .mock("GET", EMBED_PATH)
        .with_status(429)
        .expect(2)
        .create();
    let _oembed = server
        .mock("GET", "/oembed/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();

    let extraction = extract(&server, REEL_URL).unwrap();
    embed.assert();

    let value = serde_json::to_value(&extraction).unwrap();
    assert_eq!(value["source"], "instagram");
    assert_eq!(value["caption"], "");
    assert_eq!(value["media_type"], "video");
    assert!(value.get("username").is_none());
    assert!(value.get("title").is_none());
    assert!(value["note"]
        .as_str()
        .unwrap()
        .starts_with("Could not extract caption"));
}

#[test]
fn test_missing_shortcode_makes_no_request() {
    let mut server = mockito::Server::new();
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    let result = extract(&server, "https://www.instagram.com/chef_jo/");

    any.assert();
    assert!(matches!(result, Err(ExtractError::MissingShortcode(_))));
}

#[test]
fn test_empty_oembed_reply_counts_as_failure() {
    let mut server = mockito::Server::new();
    let embed = server
        .mock("GET", EMBED_PATH)
        .with_status(429)
        .expect(2)
        .create();
    let oembed = server
        .mock("GET", "/oembed/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .expect(1)
        .create();

    let value = serde_json::to_value(extract(&server, POST_URL).unwrap()).unwrap();

    embed.assert();
    oembed.assert();
    assert_eq!(value["caption"], "");
    assert!(value.get("title").is_none());
    assert!(value.get("username").is_none());
    assert!(value.get("thumbnail").is_none());
    assert!(value["note"]
        .as_str()
        .unwrap()
        .starts_with("Could not extract caption"));
}

#[test]
fn test_oembed_null_fields_read_as_empty() {
    let mut server = mockito::Server::new();
    let _embed = server
        .mock("GET", EMBED_PATH)
        .with_status(429)
        .expect(2)
        .create();
    let _oembed = server
        .mock("GET", "/oembed/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"title": null, "author_name": "chef_jo", "version": "1.0"}"#)
        .create();

    let Extraction::Instagram(post) = extract(&server, POST_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    assert_eq!(post.title.as_deref(), Some(""));
    assert_eq!(post.username.as_deref(), Some("chef_jo"));
    assert_eq!(post.thumbnail.as_deref(), Some(""));
    assert!(post.note.unwrap().starts_with("Embed rate-limited"));
}

#[test]
fn test_caption_found_on_second_embed_attempt() {
    let mut server = mockito::Server::new();
    let login_page = server
        .mock("GET", EMBED_PATH)
        .with_status(200)
        .with_body("<html><body>Log in to see this post</body></html>")
        .expect(1)
        .create();
    let caption_page = server
        .mock("GET", EMBED_PATH)
        .with_status(200)
        .with_body(create_embed_html("Second time lucky"))
        .expect(1)
        .create();
    let oembed = server
        .mock("GET", "/oembed/")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let Extraction::Instagram(post) = extract(&server, POST_URL).unwrap() else {
        panic!("expected an Instagram result");
    };

    login_page.assert();
    caption_page.assert();
    oembed.assert();
    assert_eq!(post.caption, "Second time lucky");
    assert_eq!(post.username.as_deref(), Some("chef_jo"));
    assert!(post.note.is_none());
    assert!(post.title.is_none());
}
