//! Localized error messages.
//!
//! Messages are looked up by [`ErrorCode`]; the language comes from the
//! `Accept-Language` request header. English is the fallback.

use axum::{
    Json,
    extract::Request,
    http::header::ACCEPT_LANGUAGE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use engine::ErrorCode;

use crate::ErrorReport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Ru,
    Uz,
}

impl Lang {
    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split('-').next().unwrap_or_default().trim();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ru" => Some(Self::Ru),
            "uz" => Some(Self::Uz),
            _ => None,
        }
    }

    /// Pick the supported language with the highest `q` weight.
    ///
    /// `"uz-Latn;q=0.5, ru;q=0.9"` gives [`Lang::Ru`]. Earlier entries win ties.
    pub fn from_accept_language(header: &str) -> Self {
        let mut best: Option<(Lang, f32)> = None;
        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let Some(lang) = parts.next().and_then(Self::from_tag) else {
                continue;
            };
            let weight = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            if best.is_none_or(|(_, top)| weight > top) {
                best = Some((lang, weight));
            }
        }
        best.map(|(lang, _)| lang).unwrap_or_default()
    }
}

pub(crate) fn message(code: ErrorCode, lang: Lang) -> &'static str {
    match lang {
        Lang::En => match code {
            ErrorCode::UserAlreadyExists => "User already exists",
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserHasInsufficientBalance => "User has insufficient balance",
            ErrorCode::TransactionNotFound => "Transaction not found",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductAlreadyExists => "Product already exists",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryAlreadyExists => "Category already exists",
            ErrorCode::CountNotEnough => "Not enough items in stock",
            ErrorCode::CategoryInUse => "Category is still used by products",
            ErrorCode::TransactionItemNotFound => "Transaction item not found",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InternalError => "Internal server error",
        },
        Lang::Ru => match code {
            ErrorCode::UserAlreadyExists => "Пользователь уже существует",
            ErrorCode::UserNotFound => "Пользователь не найден",
            ErrorCode::UserHasInsufficientBalance => "Недостаточно средств на балансе",
            ErrorCode::TransactionNotFound => "Транзакция не найдена",
            ErrorCode::ProductNotFound => "Продукт не найден",
            ErrorCode::ProductAlreadyExists => "Продукт уже существует",
            ErrorCode::CategoryNotFound => "Категория не найдена",
            ErrorCode::CategoryAlreadyExists => "Категория уже существует",
            ErrorCode::CountNotEnough => "Недостаточно товара на складе",
            ErrorCode::CategoryInUse => "Категория используется продуктами",
            ErrorCode::TransactionItemNotFound => "Элемент транзакции не найден",
            ErrorCode::ValidationFailed => "Ошибка валидации",
            ErrorCode::InternalError => "Внутренняя ошибка сервера",
        },
        Lang::Uz => match code {
            ErrorCode::UserAlreadyExists => "Foydalanuvchi allaqachon mavjud",
            ErrorCode::UserNotFound => "Foydalanuvchi topilmadi",
            ErrorCode::UserHasInsufficientBalance => "Foydalanuvchi balansida mablag' yetarli emas",
            ErrorCode::TransactionNotFound => "Tranzaksiya topilmadi",
            ErrorCode::ProductNotFound => "Mahsulot topilmadi",
            ErrorCode::ProductAlreadyExists => "Mahsulot allaqachon mavjud",
            ErrorCode::CategoryNotFound => "Kategoriya topilmadi",
            ErrorCode::CategoryAlreadyExists => "Kategoriya allaqachon mavjud",
            ErrorCode::CountNotEnough => "Omborda mahsulot yetarli emas",
            ErrorCode::CategoryInUse => "Kategoriya mahsulotlarda ishlatilmoqda",
            ErrorCode::TransactionItemNotFound => "Tranzaksiya elementi topilmadi",
            ErrorCode::ValidationFailed => "Validatsiya xatosi",
            ErrorCode::InternalError => "Serverning ichki xatosi",
        },
    }
}

/// Re-render error bodies in the language the client asked for.
pub(crate) async fn localize(request: Request, next: Next) -> Response {
    let lang = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Lang::from_accept_language)
        .unwrap_or_default();

    let response = next.run(request).await;
    if lang == Lang::default() {
        return response;
    }
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };
    (response.status(), Json(report.body(lang))).into_response()
}
