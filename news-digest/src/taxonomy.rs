//! カテゴリ定義とキーワード辞書。
//!
//! 各カテゴリは分類用キーワード、スコアリング用の特徴語、カテゴリボーナスを
//! データとして保持します。辞書は読み込み時に完全性を検証します。
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::text::fold;

/// 記事カテゴリ。宣言順が分類時のタイブレーク順になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ai,
    Iot,
    Cloud,
    Security,
    Dx,
    Other,
}

impl Category {
    /// `Other` を除く分類対象カテゴリ (列挙順)。
    pub const CLASSIFIED: [Category; 5] = [
        Category::Ai,
        Category::Iot,
        Category::Cloud,
        Category::Security,
        Category::Dx,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ai => "ai",
            Category::Iot => "iot",
            Category::Cloud => "cloud",
            Category::Security => "security",
            Category::Dx => "dx",
            Category::Other => "other",
        }
    }

    /// 投稿メッセージ用の表示ラベル。
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Iot => "IoT",
            Category::Cloud => "クラウド",
            Category::Security => "セキュリティ",
            Category::Dx => "DX",
            Category::Other => "その他",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProfileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "ai" => Ok(Category::Ai),
            "iot" => Ok(Category::Iot),
            "cloud" => Ok(Category::Cloud),
            "security" => Ok(Category::Security),
            "dx" => Ok(Category::Dx),
            "other" => Ok(Category::Other),
            _ => Err(ProfileError::UnknownCategory(raw.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("category {0} cannot carry a keyword profile")]
    ReservedCategory(Category),
    #[error("category {0} is defined more than once")]
    DuplicateCategory(Category),
    #[error("category {0} has no profile")]
    MissingCategory(Category),
    #[error("category {0} has an empty keyword list")]
    EmptyKeywords(Category),
    #[error("category {category} has an invalid bonus: {bonus}")]
    InvalidBonus { category: Category, bonus: f64 },
    #[error("no target categories configured")]
    NoTargets,
    #[error("feed list is empty")]
    EmptyFeeds,
    #[error("invalid feed url {url}: {reason}")]
    InvalidFeedUrl { url: String, reason: String },
    #[error("failed to read profile {path}: {reason}")]
    Read { path: String, reason: String },
    #[error("failed to parse profile {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// 1カテゴリ分のキーワードプロファイル。
///
/// キーワードと特徴語は [`fold`] 済みの形で保持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: Category,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub signature_terms: Vec<String>,
    pub bonus: f64,
}

impl CategoryProfile {
    #[must_use]
    pub fn new(category: Category, keywords: &[&str], signature_terms: &[&str], bonus: f64) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            signature_terms: signature_terms.iter().map(|k| (*k).to_string()).collect(),
            bonus,
        }
    }

    fn folded(self) -> Self {
        Self {
            category: self.category,
            keywords: fold_terms(self.keywords),
            signature_terms: fold_terms(self.signature_terms),
            bonus: self.bonus,
        }
    }
}

fn fold_terms(terms: Vec<String>) -> Vec<String> {
    let mut folded: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = fold(term.trim());
        if !term.is_empty() && !folded.contains(&term) {
            folded.push(term);
        }
    }
    folded
}

/// 検証済みのカテゴリ辞書。プロファイルは [`Category`] の列挙順に並ぶ。
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    profiles: Vec<CategoryProfile>,
}

impl Taxonomy {
    /// プロファイル一覧から辞書を構築し、完全性を検証する。
    ///
    /// # Errors
    /// `other` へのプロファイル定義、重複、欠落、空のキーワード、
    /// 負または非有限のボーナスがあれば [`ProfileError`] を返す。
    pub fn new(profiles: Vec<CategoryProfile>) -> Result<Self, ProfileError> {
        let mut slots: Vec<Option<CategoryProfile>> = vec![None; Category::CLASSIFIED.len()];

        for profile in profiles {
            let Some(index) = Category::CLASSIFIED
                .iter()
                .position(|c| *c == profile.category)
            else {
                return Err(ProfileError::ReservedCategory(profile.category));
            };
            if slots[index].is_some() {
                return Err(ProfileError::DuplicateCategory(profile.category));
            }
            if !profile.bonus.is_finite() || profile.bonus < 0.0 {
                return Err(ProfileError::InvalidBonus {
                    category: profile.category,
                    bonus: profile.bonus,
                });
            }
            let profile = profile.folded();
            if profile.keywords.is_empty() {
                return Err(ProfileError::EmptyKeywords(profile.category));
            }
            slots[index] = Some(profile);
        }

        let profiles = slots
            .into_iter()
            .zip(Category::CLASSIFIED)
            .map(|(slot, category)| slot.ok_or(ProfileError::MissingCategory(category)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { profiles })
    }

    /// 既定辞書に上書きプロファイルを適用する。上書きはカテゴリ単位で置き換える。
    ///
    /// # Errors
    /// 適用後の辞書が検証に失敗した場合は [`ProfileError`] を返す。
    pub fn with_overrides(overrides: Vec<CategoryProfile>) -> Result<Self, ProfileError> {
        let mut seen = Vec::with_capacity(overrides.len());
        for profile in &overrides {
            if seen.contains(&profile.category) {
                return Err(ProfileError::DuplicateCategory(profile.category));
            }
            seen.push(profile.category);
        }

        let mut merged: Vec<CategoryProfile> = default_profiles()
            .into_iter()
            .filter(|profile| !seen.contains(&profile.category))
            .collect();
        merged.extend(overrides);
        Self::new(merged)
    }

    #[must_use]
    pub fn profiles(&self) -> &[CategoryProfile] {
        &self.profiles
    }

    #[must_use]
    pub fn profile(&self, category: Category) -> Option<&CategoryProfile> {
        self.profiles.iter().find(|p| p.category == category)
    }

    /// カテゴリボーナス。`other` は 0。
    #[must_use]
    pub fn bonus(&self, category: Category) -> f64 {
        self.profile(category).map_or(0.0, |p| p.bonus)
    }

    /// 対象カテゴリの指定を検証する。
    ///
    /// # Errors
    /// 空の指定や `other` を含む指定は [`ProfileError`] を返す。
    pub fn validate_targets(&self, targets: &[Category]) -> Result<(), ProfileError> {
        if targets.is_empty() {
            return Err(ProfileError::NoTargets);
        }
        for target in targets {
            if self.profile(*target).is_none() {
                return Err(ProfileError::MissingCategory(*target));
            }
        }
        Ok(())
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(default_profiles()).expect("built-in taxonomy is complete")
    }
}

/// 組み込みのカテゴリ辞書。
#[must_use]
pub fn default_profiles() -> Vec<CategoryProfile> {
    vec![
        CategoryProfile::new(
            Category::Ai,
            &[
                "ai",
                "人工知能",
                "機械学習",
                "マシンラーニング",
                "深層学習",
                "ディープラーニング",
                "chatgpt",
                "チャットgpt",
                "claude",
                "gemini",
                "copilot",
                "gpt",
                "llm",
                "生成ai",
                "画像生成",
                "自然言語処理",
                "nlp",
                "neural",
                "tensorflow",
                "pytorch",
                "openai",
                "anthropic",
                "音声認識",
                "顔認識",
                "予測モデル",
                "データサイエンス",
            ],
            &["chatgpt", "gpt", "openai", "claude", "gemini", "生成ai", "llm"],
            3.0,
        ),
        CategoryProfile::new(
            Category::Iot,
            &[
                "iot",
                "モノのインターネット",
                "センサー",
                "スマートホーム",
                "スマート家電",
                "エッジコンピューティング",
                "ウェアラブル",
                "組み込み",
                "ロボット",
                "ドローン",
                "自動運転",
                "5g",
                "raspberry pi",
                "ラズパイ",
                "arduino",
            ],
            &["iot", "エッジコンピューティング", "スマートホーム", "センサー"],
            2.0,
        ),
        CategoryProfile::new(
            Category::Cloud,
            &[
                "クラウド",
                "cloud",
                "aws",
                "azure",
                "gcp",
                "google cloud",
                "kubernetes",
                "docker",
                "コンテナ",
                "サーバーレス",
                "serverless",
                "saas",
                "paas",
                "iaas",
                "データセンター",
                "仮想化",
                "マイクロサービス",
            ],
            &["aws", "azure", "google cloud", "kubernetes", "クラウド"],
            2.0,
        ),
        CategoryProfile::new(
            Category::Security,
            &[
                "セキュリティ",
                "security",
                "脆弱性",
                "サイバー攻撃",
                "ランサムウェア",
                "マルウェア",
                "不正アクセス",
                "情報漏えい",
                "情報漏洩",
                "フィッシング",
                "ゼロデイ",
                "ゼロトラスト",
                "暗号",
                "ハッキング",
                "cve",
            ],
            &["脆弱性", "ランサムウェア", "ゼロデイ", "不正アクセス", "情報漏えい"],
            2.5,
        ),
        CategoryProfile::new(
            Category::Dx,
            &[
                "dx",
                "デジタルトランスフォーメーション",
                "デジタル化",
                "業務効率化",
                "自動化",
                "rpa",
                "ペーパーレス",
                "ノーコード",
                "ローコード",
                "業務改善",
                "デジタル庁",
                "電子契約",
                "テレワーク",
                "リスキリング",
            ],
            &["dx", "デジタルトランスフォーメーション", "ノーコード", "rpa"],
            1.5,
        ),
    ]
}
