//! Page templates and rendering
//!
//! Every page shares one layout (head, navigation, footer). Each
//! [`Template`] contributes its own stylesheet and main body, and
//! repeated pieces (cards, list items, group sections) are fragment
//! templates. All templates are plain strings with `{{slot}}`
//! placeholders filled in a single pass by [`fill`].

use crate::storage::WorkRecord;
use crate::summarize::{ExcerptTruncation, Summarizer};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};

/// Group heading for works without a genre
pub const UNKNOWN_GENRE: &str = "分類なし";

/// Group heading for works without a year
pub const UNKNOWN_YEAR: &str = "不明";

/// The pages the site is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// One page per work
    WorkDetail,
    /// Landing page with stats, search and all cards
    Index,
    ByAuthor,
    ByGenre,
    ByYear,
}

impl Template {
    /// Listing pages, in the order they are written
    pub const LISTINGS: [Template; 4] = [
        Template::Index,
        Template::ByAuthor,
        Template::ByGenre,
        Template::ByYear,
    ];

    /// Fixed file name of a listing page; `None` for detail pages
    pub fn file_name(self) -> Option<&'static str> {
        match self {
            Template::WorkDetail => None,
            Template::Index => Some("index.html"),
            Template::ByAuthor => Some("by_author.html"),
            Template::ByGenre => Some("by_genre.html"),
            Template::ByYear => Some("by_year.html"),
        }
    }

    fn style(self) -> &'static str {
        match self {
            Template::WorkDetail => DETAIL_STYLE,
            Template::Index => INDEX_STYLE,
            Template::ByAuthor | Template::ByGenre | Template::ByYear => GROUP_STYLE,
        }
    }
}

/// A work together with the file name of its detail page
#[derive(Debug, Clone)]
pub struct SiteEntry {
    pub work: WorkRecord,
    pub file_name: String,
}

/// Everything a template needs to render
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Site name shown in headers, titles and the footer
    pub site_title: String,

    /// Generation date printed in the footer
    pub generated_on: NaiveDate,

    /// Index card excerpt budget in characters
    pub excerpt_length: usize,

    /// Works in store order, each with its assigned file name
    pub entries: Vec<SiteEntry>,
}

impl SiteContext {
    pub fn total_works(&self) -> usize {
        self.entries.len()
    }

    pub fn total_authors(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.work.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn total_genres(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.work.genre.as_deref())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// A rendered page ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub file_name: String,
    pub html: String,
}

/// A value substituted into a slot
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// Escaped before insertion
    Text(&'a str),
    /// Inserted verbatim; already rendered from escaped parts
    Markup(&'a str),
}

/// Renders a template
///
/// `WorkDetail` yields one page per entry; the listing templates yield a
/// single page.
pub fn render(template: Template, ctx: &SiteContext) -> Vec<RenderedPage> {
    match template {
        Template::WorkDetail => ctx
            .entries
            .iter()
            .map(|entry| RenderedPage {
                file_name: entry.file_name.clone(),
                html: render_detail(entry, ctx),
            })
            .collect(),
        listing => {
            let main = match listing {
                Template::Index => render_index_main(ctx),
                Template::ByAuthor => render_by_author_main(ctx),
                Template::ByGenre => render_by_genre_main(ctx),
                _ => render_by_year_main(ctx),
            };
            let (page_title, heading) = match listing {
                Template::Index => (
                    format!("{} {}作品", ctx.site_title, ctx.total_works()),
                    String::new(),
                ),
                Template::ByAuthor => (format!("著者別一覧 - {}", ctx.site_title), "著者別一覧".into()),
                Template::ByGenre => (
                    format!("ジャンル別一覧 - {}", ctx.site_title),
                    "ジャンル別一覧".into(),
                ),
                _ => (format!("年代別一覧 - {}", ctx.site_title), "年代別一覧".into()),
            };
            let header = if listing == Template::Index {
                fill(INDEX_HEADER, &[("site_title", Slot::Text(&ctx.site_title))])
            } else {
                fill(LISTING_HEADER, &[("heading", Slot::Text(&heading))])
            };
            let description = format!(
                "{}作品のあらすじ・要約をわかりやすく紹介。",
                ctx.total_works()
            );
            let script = if listing == Template::Index {
                SEARCH_SCRIPT
            } else {
                ""
            };

            vec![RenderedPage {
                file_name: listing.file_name().unwrap_or_default().to_string(),
                html: layout(
                    ctx,
                    listing,
                    &page_title,
                    &description,
                    &header,
                    &main,
                    script,
                ),
            }]
        }
    }
}

fn layout(
    ctx: &SiteContext,
    template: Template,
    page_title: &str,
    description: &str,
    header: &str,
    main: &str,
    script: &str,
) -> String {
    let year = ctx.generated_on.year().to_string();
    let date = ctx.generated_on.format("%Y-%m-%d").to_string();

    fill(
        LAYOUT,
        &[
            ("page_title", Slot::Text(page_title)),
            ("description", Slot::Text(description)),
            ("base_style", Slot::Markup(BASE_STYLE)),
            ("style", Slot::Markup(template.style())),
            ("header", Slot::Markup(header)),
            ("main", Slot::Markup(main)),
            ("site_title", Slot::Text(&ctx.site_title)),
            ("year", Slot::Text(&year)),
            ("date", Slot::Text(&date)),
            ("script", Slot::Markup(script)),
        ],
    )
}

fn render_detail(entry: &SiteEntry, ctx: &SiteContext) -> String {
    let work = &entry.work;

    let mut meta = fill(META_SPAN, &[("text", Slot::Text(&format!("👤 {}", work.author)))]);
    if let Some(year) = work.year {
        meta.push_str(&fill(META_SPAN, &[("text", Slot::Text(&format!("📅 {}年", year)))]));
    }
    if let Some(genre) = &work.genre {
        meta.push_str(&fill(META_SPAN, &[("text", Slot::Text(&format!("📖 {}", genre)))]));
    }
    if let Some(length) = &work.length {
        meta.push_str(&fill(META_SPAN, &[("text", Slot::Text(&format!("📏 {}", length)))]));
    }

    let tags: String = work
        .tags
        .iter()
        .map(|tag| fill(TAG, &[("tag", Slot::Text(tag))]))
        .collect();

    let source = match &work.source_url {
        Some(url) => fill(
            SOURCE_BOX,
            &[
                ("source_url", Slot::Text(url)),
                ("title", Slot::Text(&work.title)),
                ("author", Slot::Text(&work.author)),
            ],
        ),
        None => String::new(),
    };

    let main = fill(
        DETAIL_MAIN,
        &[
            ("author", Slot::Text(&work.author)),
            ("title", Slot::Text(&work.title)),
            ("meta", Slot::Markup(&meta)),
            ("tags", Slot::Markup(&tags)),
            ("summary", Slot::Text(&work.summary)),
            ("source", Slot::Markup(&source)),
        ],
    );
    let header = fill(DETAIL_HEADER, &[("site_title", Slot::Text(&ctx.site_title))]);

    layout(
        ctx,
        Template::WorkDetail,
        &format!("{}({}) - {}", work.title, work.author, ctx.site_title),
        &format!(
            "{}({})のあらすじ・要約。青空文庫の作品をわかりやすく紹介。",
            work.title, work.author
        ),
        &header,
        &main,
        "",
    )
}

fn render_index_main(ctx: &SiteContext) -> String {
    let excerpt = ExcerptTruncation::new(ctx.excerpt_length);

    let cards: String = ctx
        .entries
        .iter()
        .map(|entry| {
            let work = &entry.work;
            let mut meta = Vec::new();
            if let Some(year) = work.year {
                meta.push(format!("📅 {}年", year));
            }
            if let Some(genre) = &work.genre {
                meta.push(format!("📖 {}", genre));
            }

            fill(
                WORK_CARD,
                &[
                    ("title", Slot::Text(&work.title)),
                    ("author", Slot::Text(&work.author)),
                    ("genre", Slot::Text(work.genre.as_deref().unwrap_or_default())),
                    ("meta", Slot::Text(&meta.join(" | "))),
                    ("excerpt", Slot::Text(&excerpt.summarize(&work.summary))),
                    ("file_name", Slot::Text(&href_for(&entry.file_name))),
                ],
            )
        })
        .collect();

    fill(
        INDEX_MAIN,
        &[
            ("total_works", Slot::Text(&ctx.total_works().to_string())),
            ("total_authors", Slot::Text(&ctx.total_authors().to_string())),
            ("total_genres", Slot::Text(&ctx.total_genres().to_string())),
            ("cards", Slot::Markup(&cards)),
        ],
    )
}

fn render_by_author_main(ctx: &SiteContext) -> String {
    let mut groups: BTreeMap<&str, Vec<&SiteEntry>> = BTreeMap::new();
    for entry in &ctx.entries {
        groups.entry(&entry.work.author).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(author, entries)| {
            group_section(author, &entries, |work| {
                [work.year.map(|y| format!("{}年", y)), work.genre.clone()]
            })
        })
        .collect()
}

fn render_by_genre_main(ctx: &SiteContext) -> String {
    let mut groups: BTreeMap<&str, Vec<&SiteEntry>> = BTreeMap::new();
    let mut unclassified = Vec::new();
    for entry in &ctx.entries {
        match &entry.work.genre {
            Some(genre) => groups.entry(genre.as_str()).or_default().push(entry),
            None => unclassified.push(entry),
        }
    }

    let meta = |work: &WorkRecord| [Some(work.author.clone()), work.year.map(|y| format!("{}年", y))];

    let mut html: String = groups
        .into_iter()
        .map(|(genre, entries)| group_section(genre, &entries, meta))
        .collect();
    if !unclassified.is_empty() {
        html.push_str(&group_section(UNKNOWN_GENRE, &unclassified, meta));
    }
    html
}

fn render_by_year_main(ctx: &SiteContext) -> String {
    let mut groups: BTreeMap<i32, Vec<&SiteEntry>> = BTreeMap::new();
    let mut undated = Vec::new();
    for entry in &ctx.entries {
        match entry.work.year {
            Some(year) => groups.entry(year).or_default().push(entry),
            None => undated.push(entry),
        }
    }

    let meta = |work: &WorkRecord| [Some(work.author.clone()), work.genre.clone()];

    let mut html: String = groups
        .into_iter()
        .map(|(year, entries)| group_section(&format!("{}年", year), &entries, meta))
        .collect();
    if !undated.is_empty() {
        html.push_str(&group_section(UNKNOWN_YEAR, &undated, meta));
    }
    html
}

fn group_section<F>(name: &str, entries: &[&SiteEntry], meta: F) -> String
where
    F: Fn(&WorkRecord) -> [Option<String>; 2],
{
    let items: String = entries
        .iter()
        .map(|entry| {
            let meta = meta(&entry.work)
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" | ");
            fill(
                WORK_ITEM,
                &[
                    ("file_name", Slot::Text(&href_for(&entry.file_name))),
                    ("title", Slot::Text(&entry.work.title)),
                    ("meta", Slot::Text(&meta)),
                ],
            )
        })
        .collect();

    fill(
        GROUP_SECTION,
        &[
            ("name", Slot::Text(name)),
            ("count", Slot::Text(&entries.len().to_string())),
            ("items", Slot::Markup(&items)),
        ],
    )
}

/// Fills `{{slot}}` placeholders in one pass
///
/// Substituted values are never rescanned, so a value containing `{{x}}`
/// is emitted as-is (escaped if it is text). Unknown slots are left in
/// place.
pub fn fill(template: &str, slots: &[(&str, Slot<'_>)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];

        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after[..close];
        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, Slot::Text(value))) => out.push_str(&escape_html(value)),
            Some((_, Slot::Markup(value))) => out.push_str(value),
            None => {
                tracing::debug!("unfilled template slot {}", name);
                out.push_str(&rest[open..open + 2 + close + 2]);
            }
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Percent-encodes a page file name for use as a relative link
///
/// Sanitized names may still hold `#` or `%`; every byte outside
/// `[A-Za-z0-9*-._]` is encoded.
pub fn href_for(file_name: &str) -> String {
    url::form_urlencoded::byte_serialize(file_name.as_bytes()).collect()
}

/// Escapes text for element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ===== Templates =====

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="description" content="{{description}}">
  <title>{{page_title}}</title>
  <style>
{{base_style}}
{{style}}
  </style>
</head>
<body>
{{header}}
  <nav>
    <div class="container">
      <a href="index.html">全作品</a>
      <a href="by_author.html">著者別</a>
      <a href="by_year.html">年代別</a>
      <a href="by_genre.html">ジャンル別</a>
    </div>
  </nav>

  <main>
{{main}}
  </main>

  <footer>
    <p>&copy; {{year}} {{site_title}}</p>
    <p class="updated">最終更新: {{date}}</p>
  </footer>
{{script}}
</body>
</html>
"#;

const BASE_STYLE: &str = r#"    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Hiragino Sans', 'Yu Gothic', sans-serif; line-height: 1.8; background: #f8f9fa; color: #333; }
    header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px 20px; text-align: center; }
    nav { background: #34495e; padding: 15px; position: sticky; top: 0; z-index: 100; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
    nav .container { max-width: 1200px; margin: 0 auto; display: flex; gap: 20px; justify-content: center; flex-wrap: wrap; }
    nav a { color: white; text-decoration: none; padding: 8px 16px; border-radius: 4px; font-weight: bold; }
    nav a:hover { background: rgba(255,255,255,0.2); }
    main { max-width: 1200px; margin: 40px auto; padding: 0 20px; }
    footer { background: #2c3e50; color: white; padding: 40px 20px; text-align: center; margin-top: 80px; }
    footer .updated { margin-top: 10px; opacity: 0.8; }"#;

const DETAIL_STYLE: &str = r#"    header .container { max-width: 1200px; margin: 0 auto; display: flex; justify-content: space-between; align-items: center; }
    header { padding: 20px; text-align: left; }
    header h1 { font-size: 1.5em; }
    header a { color: white; text-decoration: none; opacity: 0.9; }
    main { max-width: 900px; }
    .breadcrumb { margin-bottom: 20px; font-size: 0.9em; color: #666; }
    .breadcrumb a { color: #667eea; text-decoration: none; }
    .work-card { background: white; border-radius: 12px; padding: 40px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
    .work-header h2 { font-size: 2.2em; color: #2c3e50; margin-bottom: 15px; line-height: 1.4; }
    .work-meta { display: flex; flex-wrap: wrap; gap: 15px; margin-bottom: 20px; font-size: 0.95em; color: #555; }
    .tag { display: inline-block; background: #667eea; color: white; padding: 3px 10px; border-radius: 3px; font-size: 0.85em; margin-right: 5px; }
    .summary-section { margin-top: 30px; }
    .summary-section h3 { color: #667eea; margin-bottom: 15px; font-size: 1.3em; border-left: 4px solid #667eea; padding-left: 12px; }
    .summary-text { white-space: pre-wrap; line-height: 2; font-size: 1.05em; }
    .source-box { background: #f0f4ff; padding: 25px; border-radius: 8px; margin-top: 30px; }
    .source-box h3 { color: #667eea; margin-bottom: 15px; font-size: 1.1em; }
    .source-box a { color: #667eea; word-break: break-all; }
    .source-box .credit { margin-top: 10px; font-size: 0.9em; color: #666; }"#;

const INDEX_STYLE: &str = r#"    header { padding: 60px 20px; }
    header h1 { font-size: 2.8em; margin-bottom: 15px; }
    header p { font-size: 1.2em; opacity: 0.95; }
    .stats { margin: 0 auto 40px; display: flex; justify-content: center; gap: 40px; flex-wrap: wrap; }
    .stat-box { text-align: center; }
    .stat-box .number { font-size: 2.5em; color: #667eea; font-weight: bold; }
    .stat-box .label { color: #666; margin-top: 5px; }
    .search-box { background: white; padding: 25px; border-radius: 12px; margin-bottom: 40px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
    .search-box input { width: 100%; padding: 15px 20px; font-size: 1.1em; border: 2px solid #e0e0e0; border-radius: 8px; }
    .search-box input:focus { outline: none; border-color: #667eea; }
    .works-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 25px; }
    .work-card { background: white; padding: 25px; border-radius: 12px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); transition: all 0.3s; }
    .work-card:hover { transform: translateY(-5px); box-shadow: 0 8px 15px rgba(0,0,0,0.15); }
    .work-card h3 { color: #2c3e50; margin-bottom: 10px; font-size: 1.4em; line-height: 1.4; }
    .work-card .author { color: #667eea; font-weight: bold; margin-bottom: 10px; }
    .work-card .meta { color: #999; font-size: 0.9em; margin-bottom: 15px; }
    .work-card .excerpt { color: #555; line-height: 1.7; margin-bottom: 20px; }
    .work-card a { display: inline-block; background: #667eea; color: white; padding: 10px 20px; text-decoration: none; border-radius: 6px; font-weight: bold; }
    .no-results { text-align: center; padding: 60px 20px; color: #999; font-size: 1.2em; }
    @media (max-width: 768px) {
      header h1 { font-size: 2em; }
      .works-grid { grid-template-columns: 1fr; }
    }"#;

const GROUP_STYLE: &str = r#"    header h1 { font-size: 2.2em; }
    .group-section { background: white; padding: 30px; border-radius: 12px; margin-bottom: 25px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
    .group-section h2 { color: #2c3e50; margin-bottom: 20px; font-size: 1.8em; border-bottom: 3px solid #667eea; padding-bottom: 10px; }
    .works-list { display: grid; gap: 15px; }
    .work-item { padding: 15px; border-left: 4px solid #667eea; background: #f8f9fa; border-radius: 4px; }
    .work-item a { color: #667eea; text-decoration: none; font-size: 1.1em; font-weight: bold; }
    .work-item .meta { color: #999; font-size: 0.9em; margin-top: 5px; }"#;

const DETAIL_HEADER: &str = r#"  <header>
    <div class="container">
      <h1>{{site_title}}</h1>
      <a href="index.html">トップへ</a>
    </div>
  </header>"#;

const INDEX_HEADER: &str = r#"  <header>
    <h1>{{site_title}}</h1>
    <p>名作を、わかりやすい要約で。</p>
  </header>"#;

const LISTING_HEADER: &str = r#"  <header>
    <h1>{{heading}}</h1>
  </header>"#;

const DETAIL_MAIN: &str = r#"    <div class="breadcrumb">
      <a href="index.html">トップ</a> &gt;
      <a href="by_author.html#{{author}}">{{author}}</a> &gt;
      {{title}}
    </div>

    <article class="work-card">
      <div class="work-header">
        <h2>{{title}}</h2>
        <div class="work-meta">{{meta}}</div>
        <div class="tags">{{tags}}</div>
      </div>

      <div class="summary-section">
        <h3>📝 あらすじ・要約</h3>
        <div class="summary-text">{{summary}}</div>
      </div>
{{source}}
    </article>"#;

const META_SPAN: &str = "<span>{{text}}</span>";

const TAG: &str = r#"<span class="tag">{{tag}}</span>"#;

const SOURCE_BOX: &str = r#"
      <div class="source-box">
        <h3>📚 原文を読む</h3>
        <p><a href="{{source_url}}" target="_blank" rel="noopener noreferrer">{{source_url}}</a></p>
        <p class="credit">青空文庫『{{title}}』{{author}} 著</p>
      </div>"#;

const INDEX_MAIN: &str = r#"    <div class="stats">
      <div class="stat-box">
        <div class="number" data-stat="works">{{total_works}}</div>
        <div class="label">作品</div>
      </div>
      <div class="stat-box">
        <div class="number" data-stat="authors">{{total_authors}}</div>
        <div class="label">著者</div>
      </div>
      <div class="stat-box">
        <div class="number" data-stat="genres">{{total_genres}}</div>
        <div class="label">ジャンル</div>
      </div>
    </div>

    <div class="search-box">
      <input type="text" id="searchInput" placeholder="🔍 作品名や著者名で検索...">
    </div>

    <div class="works-grid" id="worksGrid">
{{cards}}
    </div>

    <div class="no-results" id="noResults" style="display: none;">
      該当する作品が見つかりませんでした
    </div>"#;

const WORK_CARD: &str = r#"      <article class="work-card" data-title="{{title}}" data-author="{{author}}" data-genre="{{genre}}">
        <h3>{{title}}</h3>
        <div class="author">{{author}}</div>
        <div class="meta">{{meta}}</div>
        <div class="excerpt">{{excerpt}}</div>
        <a href="{{file_name}}">続きを読む →</a>
      </article>
"#;

const GROUP_SECTION: &str = r#"    <section class="group-section" id="{{name}}">
      <h2>{{name}} ({{count}}作品)</h2>
      <div class="works-list">
{{items}}
      </div>
    </section>
"#;

const WORK_ITEM: &str = r#"        <div class="work-item">
          <a href="{{file_name}}">{{title}}</a>
          <div class="meta">{{meta}}</div>
        </div>
"#;

const SEARCH_SCRIPT: &str = r#"  <script>
    const searchInput = document.getElementById('searchInput');
    const worksGrid = document.getElementById('worksGrid');
    const noResults = document.getElementById('noResults');

    searchInput.addEventListener('input', function() {
      const query = this.value.toLowerCase().trim();
      const cards = worksGrid.querySelectorAll('.work-card');
      let visibleCount = 0;

      cards.forEach(card => {
        const title = card.dataset.title.toLowerCase();
        const author = card.dataset.author.toLowerCase();

        if (title.includes(query) || author.includes(query)) {
          card.style.display = 'block';
          visibleCount++;
        } else {
          card.style.display = 'none';
        }
      });

      noResults.style.display = visibleCount === 0 ? 'block' : 'none';
    });
  </script>"#;
