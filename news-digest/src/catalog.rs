//! 取得対象フィードと情報源名の対応表。
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// フィードの出自グループ。スコアリングの出自ボーナスに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedBucket {
    /// 主要ニュースポータル
    Tier1,
    /// IT系専門メディア
    Tier2,
    /// 技術系・ビジネス系メディア
    Tier3,
    /// 企業テックブログ、コミュニティ、研究機関など
    Additional,
}

impl FeedBucket {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeedBucket::Tier1 => "tier1",
            FeedBucket::Tier2 => "tier2",
            FeedBucket::Tier3 => "tier3",
            FeedBucket::Additional => "additional",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSpec {
    pub url: String,
    pub bucket: FeedBucket,
}

impl FeedSpec {
    #[must_use]
    pub fn new(url: &str, bucket: FeedBucket) -> Self {
        Self {
            url: url.to_string(),
            bucket,
        }
    }
}

const UNKNOWN_SOURCE: &str = "その他";

const SOURCE_NAMES: &[(&str, &str)] = &[
    ("news.google.com", "Google ニュース"),
    ("news.yahoo.co.jp", "Yahoo! ニュース"),
    ("feeds.reuters.com", "Reuters Japan"),
    ("itmedia.co.jp", "ITmedia"),
    ("feed.japan.cnet.com", "CNET Japan"),
    ("ascii.jp", "ASCII.jp"),
    ("watch.impress.co.jp", "Impress Watch"),
    ("internet.watch.impress.co.jp", "INTERNET Watch"),
    ("pc.watch.impress.co.jp", "PC Watch"),
    ("akiba-pc.watch.impress.co.jp", "AKIBA PC Hotline!"),
    ("forest.watch.impress.co.jp", "窓の杜"),
    ("gigazine.net", "GIGAZINE"),
    ("publickey1.jp", "Publickey"),
    ("codezine.jp", "CodeZine"),
    ("gihyo.jp", "技術評論社"),
    ("xtech.nikkei.com", "日経クロステック"),
    ("weekly.ascii.jp", "週刊アスキー"),
    ("toyokeizai.net", "東洋経済オンライン"),
    ("diamond.jp", "ダイヤモンド・オンライン"),
    ("thebridge.jp", "THE BRIDGE"),
    ("sbbit.jp", "SB Creative"),
    ("ainow.ai", "AINOW"),
    ("developers.cyberagent.co.jp", "CyberAgent"),
    ("techblog.yahoo.co.jp", "Yahoo! JAPAN Tech Blog"),
    ("developer.hatenastaff.com", "Hatena Developer Blog"),
    ("blog.recruit.co.jp", "Recruit Tech Blog"),
    ("qiita.com", "Qiita"),
    ("zenn.dev", "Zenn"),
    ("osaka-u.ac.jp", "大阪大学"),
    ("srad.jp", "スラド"),
    ("zdnet.com", "ZDNet Japan"),
];

/// フィードURLから情報源の表示名を解決する。
///
/// ホスト名に対して最も長く一致するドメインを採用するため、
/// `internet.watch.impress.co.jp` は `watch.impress.co.jp` より優先される。
#[must_use]
pub fn source_name(feed_url: &str) -> &'static str {
    let Some(host) = Url::parse(feed_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
    else {
        return UNKNOWN_SOURCE;
    };

    SOURCE_NAMES
        .iter()
        .filter(|(domain, _)| {
            host == *domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
        .max_by_key(|(domain, _)| domain.len())
        .map_or(UNKNOWN_SOURCE, |(_, name)| *name)
}

/// 組み込みのフィード一覧。
#[must_use]
pub fn default_feeds() -> Vec<FeedSpec> {
    use FeedBucket::{Additional, Tier1, Tier2, Tier3};

    vec![
        FeedSpec::new(
            "https://news.google.com/rss/search?q=AI&hl=ja&gl=JP&ceid=JP:ja",
            Tier1,
        ),
        FeedSpec::new("https://news.yahoo.co.jp/rss/topics/it.xml", Tier1),
        FeedSpec::new("https://feeds.reuters.com/reuters/JPtechnologyNews", Tier1),
        FeedSpec::new("https://rss.itmedia.co.jp/rss/2.0/itmedia_news.xml", Tier2),
        FeedSpec::new("https://rss.itmedia.co.jp/rss/2.0/itmedia_aiplus.xml", Tier2),
        FeedSpec::new("http://feed.japan.cnet.com/rss/index.rdf", Tier2),
        FeedSpec::new("https://ascii.jp/rss.xml", Tier2),
        FeedSpec::new(
            "https://www.watch.impress.co.jp/data/rss/1.0/ipw/feed.rdf",
            Tier2,
        ),
        FeedSpec::new(
            "https://internet.watch.impress.co.jp/data/rss/1.0/iw/feed.rdf",
            Tier2,
        ),
        FeedSpec::new(
            "https://pc.watch.impress.co.jp/data/rss/1.0/pcw/feed.rdf",
            Tier2,
        ),
        FeedSpec::new(
            "https://akiba-pc.watch.impress.co.jp/data/rss/1.0/ah/feed.rdf",
            Tier2,
        ),
        FeedSpec::new(
            "https://forest.watch.impress.co.jp/data/rss/1.0/wf/feed.rdf",
            Tier2,
        ),
        FeedSpec::new("https://gigazine.net/news/rss_2.0/", Tier2),
        FeedSpec::new("https://www.publickey1.jp/atom.xml", Tier3),
        FeedSpec::new("https://codezine.jp/rss/new/20/index.xml", Tier3),
        FeedSpec::new("https://gihyo.jp/feed/rss2", Tier3),
        FeedSpec::new("https://xtech.nikkei.com/rss/index.rdf", Tier3),
        FeedSpec::new("https://weekly.ascii.jp/rss.xml", Tier3),
        FeedSpec::new("https://toyokeizai.net/list/feed/rss", Tier3),
        FeedSpec::new("https://diamond.jp/list/feed/rss", Tier3),
        FeedSpec::new("https://thebridge.jp/feed", Tier3),
        FeedSpec::new("https://www.sbbit.jp/rss/HotTopics.rss", Tier3),
        FeedSpec::new("https://ainow.ai/feed/", Tier3),
        FeedSpec::new("https://developers.cyberagent.co.jp/blog/feed/", Additional),
        FeedSpec::new("https://techblog.yahoo.co.jp/atom.xml", Additional),
        FeedSpec::new("https://developer.hatenastaff.com/rss", Additional),
        FeedSpec::new("https://blog.recruit.co.jp/rtc/feed/", Additional),
        FeedSpec::new("https://qiita.com/popular-items/feed", Additional),
        FeedSpec::new("https://zenn.dev/feed", Additional),
        FeedSpec::new("https://resou.osaka-u.ac.jp/ja/rss.xml", Additional),
        FeedSpec::new("https://it.srad.jp/srad.rdf", Additional),
        FeedSpec::new("https://japan.zdnet.com/rss/index.rdf", Additional),
    ]
}
