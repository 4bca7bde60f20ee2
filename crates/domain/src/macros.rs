/// 整数ベースの ID 型を定義する宣言型マクロ
///
/// 予約・リソース・建物の ID は DB の `SERIAL` 主キーをそのまま使う。
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i32` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)`
/// - `new()`: 既存の値から ID を作成
/// - `as_i32()`: 内部値の取得
///
/// # 使用例
///
/// ```rust
/// use roomres_domain::resource::ResourceId;
///
/// let id = ResourceId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
macro_rules! define_int_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(i32);

        impl $Name {
            /// 既存の値から ID を作成する
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// 内部の値を取得する
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl From<i32> for $Name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }
    };
}
