//! Bundled sample works
//!
//! Five hand-written summaries used by `litlite init --sample` so the site
//! can be generated without scraping first.

use crate::storage::traits::{Storage, StorageResult};
use crate::storage::NewWork;

struct Sample {
    title: &'static str,
    author: &'static str,
    year: i32,
    genre: &'static str,
    length: &'static str,
    summary: &'static str,
    source_url: &'static str,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "こころ",
        author: "夏目漱石",
        year: 1914,
        genre: "長編小説",
        length: "長編",
        summary: "明治時代の学生「私」が、鎌倉の海岸で出会った「先生」との交流を描いた物語。

第一部では、私が先生に惹かれ、親交を深めていく過程が描かれる。先生は知的で魅力的だが、どこか影を抱えている。

第二部では、父の危篤の知らせで帰省した私のもとに、先生から長い遺書が届く。

第三部の遺書では、先生の青春時代の悲劇が明かされる。親友Kとの友情、同じ女性への恋、そして裏切りによってKが自殺に至った経緯が語られる。先生は罪の意識に苦しみ続け、最後は乃木大将の殉死に触発されて自殺を決意する。

人間のエゴイズムと道徳的苦悩を描いた近代文学の傑作。",
        source_url: "https://www.aozora.gr.jp/cards/000148/card773.html",
        tags: &["明治", "友情", "恋愛", "悲劇"],
    },
    Sample {
        title: "走れメロス",
        author: "太宰治",
        year: 1940,
        genre: "短編小説",
        length: "短編",
        summary: "シチリア島の村に住む羊飼いメロスは、妹の結婚式のために町へ出かける。そこで暴君ディオニス王の恐怖政治を知り、激怒して王城に乗り込む。

メロスは処刑を言い渡されるが、妹の結婚式に出席するため3日間の猶予を願い出る。友人セリヌンティウスを人質として残し、必ず戻ると約束する。

帰路、洪水や山賊に遭遇し、疲労困憊するメロスだが、友を裏切れないという信念で走り続ける。日没直前、処刑場に到着したメロスを見て、王は人間の信実を信じるようになり、二人の友情に感動する。

友情と信義をテーマにした短編の名作。",
        source_url: "https://www.aozora.gr.jp/cards/000035/card1567.html",
        tags: &["友情", "信義", "古代"],
    },
    Sample {
        title: "羅生門",
        author: "芥川龍之介",
        year: 1915,
        genre: "短編小説",
        length: "短編",
        summary: "平安時代末期、荒廃した京都。仕事を失った下人は、雨宿りのため羅生門の楼上に上がる。

そこで死体の髪を抜く老婆を見つける。最初は憎悪を感じた下人だが、老婆が「この女は生きるために蛇を干魚と偽って売っていた。自分も生きるために髪を抜いている」と語るのを聞く。

その論理に触発された下人は、「では自分も生きるために」と老婆の着物を剥ぎ取って逃げ去る。

人間のエゴイズムと善悪の相対性を描いた、芥川の代表的な短編小説。",
        source_url: "https://www.aozora.gr.jp/cards/000879/card127.html",
        tags: &["平安", "エゴイズム", "善悪"],
    },
    Sample {
        title: "銀河鉄道の夜",
        author: "宮沢賢治",
        year: 1934,
        genre: "童話・ファンタジー",
        length: "中編",
        summary: "貧しい少年ジョバンニは、病気の母を支えるため働いている。銀河の祭りの夜、親友カムパネルラと再会する。

ジョバンニが丘で目を覚ますと、銀河鉄道に乗っていた。隣にはカムパネルラがいる。二人は幻想的な銀河の旅を続け、様々な乗客と出会う。

やがてカムパネルラは「ここで降りる」と告げて姿を消す。目覚めたジョバンニは、カムパネルラが川で溺れた友人を助けようとして命を落としたことを知る。

生と死、友情と献身をテーマにした、賢治の未完の傑作。幻想的な描写と深い哲学性が魅力。",
        source_url: "https://www.aozora.gr.jp/cards/000081/card456.html",
        tags: &["ファンタジー", "友情", "献身", "生死"],
    },
    Sample {
        title: "人間失格",
        author: "太宰治",
        year: 1948,
        genre: "長編小説",
        length: "長編",
        summary: "「恥の多い生涯を送って来ました」という告白から始まる主人公・大庭葉蔵の手記。

幼少期から人間社会に馴染めず、道化を演じることで生き延びてきた葉蔵。美術学校に進学するも、酒と女に溺れ、共産主義運動に関わり、心中未遂事件を起こす。

薬物依存に陥り、精神病院に入院。最後は田舎の廃人のような生活を送ることになる。

「自分は人間を理解できない」という孤独と絶望を描いた、太宰の自伝的要素が強い作品。戦後文学を代表する問題作。",
        source_url: "https://www.aozora.gr.jp/cards/000035/card301.html",
        tags: &["昭和", "孤独", "自伝的"],
    },
];

/// The sample set as insertable works, in fixed order
pub fn sample_works() -> Vec<NewWork> {
    SAMPLES
        .iter()
        .map(|s| NewWork {
            title: s.title.to_string(),
            author: s.author.to_string(),
            summary: s.summary.to_string(),
            source_url: Some(s.source_url.to_string()),
            year: Some(s.year),
            genre: Some(s.genre.to_string()),
            length: Some(s.length.to_string()),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// Inserts the sample set as one batch
///
/// # Returns
///
/// The ids of the inserted works
pub fn load_sample_data(storage: &mut dyn Storage) -> StorageResult<Vec<i64>> {
    let ids = storage.insert_works(&sample_works())?;
    tracing::info!("Loaded {} sample works", ids.len());
    Ok(ids)
}
