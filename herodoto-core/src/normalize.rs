//! # Normalização de Formas Gregas
//!
//! O grego politônico carrega espíritos, acentos e iota subscrito; as listas
//! ouro e o texto das Histórias nem sempre grafam a mesma palavra com os
//! mesmos sinais. A comparação entre token e lista é feita sobre uma chave
//! sem diacríticos: decompõe-se a string (NFD) e removem-se as marcas
//! combinantes, mantendo apenas as letras-base.
//!
//! A forma normalizada existe SÓ para comparação — nunca é exibida nem
//! escrita em relatório.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove todos os diacríticos de uma string.
///
/// Idempotente: `strip_diacritics(strip_diacritics(s)) == strip_diacritics(s)`,
/// pois o resultado já está decomposto e sem marcas combinantes.
///
/// # Exemplo
/// `"Ἀθῆναι"` → `"Αθηναι"`
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Verifica se a forma está em caixa de título: primeira letra maiúscula e
/// nenhuma maiúscula depois dela.
///
/// É a versão de uma palavra só do `istitle()` clássico — suficiente aqui,
/// já que o corpus chega tokenizado.
pub fn is_title_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| !c.is_uppercase()),
        _ => false,
    }
}
