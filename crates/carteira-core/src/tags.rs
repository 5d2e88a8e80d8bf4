pub const CLIENT_STATUS_TAGS: &[&str] = &[
    "Novo Lead",
    "Em Atendimento",
    "Visita Agendada",
    "Proposta Enviada",
    "Pend. Documentação",
    "Ja Comprou",
];

pub const APPOINTMENT_TAGS: &[&str] = &[
    "visita",
    "imóvel",
    "contrato",
    "documentação",
    "reunião",
    "cliente",
    "terreno",
    "apresentação",
];

pub const PROPERTY_TYPE_TAGS: &[&str] = &["Casa", "Apartamento", "Terreno", "Comercial"];

pub const PROPERTY_CONDITION_TAGS: &[&str] = &["Novo", "Usado", "Reformado", "Em construção"];

pub const PROPERTY_AMENITY_TAGS: &[&str] = &[
    "Piscina",
    "Churrasqueira",
    "Garagem",
    "Jardim",
    "Varanda",
    "Elevador",
];

#[must_use]
pub fn toggle(tags: &[String], tag: &str) -> Vec<String> {
    if tags.iter().any(|existing| existing == tag) {
        tags.iter()
            .filter(|existing| existing.as_str() != tag)
            .cloned()
            .collect()
    } else {
        let mut next = tags.to_vec();
        next.push(tag.to_string());
        next
    }
}

pub fn dedupe(tags: &mut Vec<String>) {
    let mut seen: Vec<String> = Vec::new();
    tags.retain(|tag| {
        if seen.contains(tag) {
            false
        } else {
            seen.push(tag.clone());
            true
        }
    });
}

#[must_use]
pub fn property_suggestions() -> Vec<&'static str> {
    PROPERTY_TYPE_TAGS
        .iter()
        .chain(PROPERTY_CONDITION_TAGS.iter())
        .chain(PROPERTY_AMENITY_TAGS.iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|tag| (*tag).to_string()).collect()
    }

    #[test]
    fn toggle_removes_a_present_tag() {
        assert_eq!(toggle(&owned(&["A", "B"]), "A"), owned(&["B"]));
        assert_eq!(toggle(&owned(&["A", "B", "C"]), "B"), owned(&["A", "C"]));
    }

    #[test]
    fn toggle_appends_a_missing_tag_at_the_end() {
        assert_eq!(toggle(&owned(&["B"]), "A"), owned(&["B", "A"]));
        assert_eq!(toggle(&[], "visita"), owned(&["visita"]));
    }

    #[test]
    fn toggle_round_trips_to_the_original_order_for_the_last_tag() {
        let tags = owned(&["visita", "contrato"]);
        let without = toggle(&tags, "contrato");
        assert_eq!(toggle(&without, "contrato"), tags);
    }

    #[test]
    fn dedupe_keeps_the_first_occurrence() {
        let mut tags = owned(&["casa", "novo", "casa", "piscina", "novo"]);
        dedupe(&mut tags);
        assert_eq!(tags, owned(&["casa", "novo", "piscina"]));
    }

    #[test]
    fn property_suggestions_cover_all_groups() {
        let suggestions = property_suggestions();
        assert!(suggestions.contains(&"Casa"));
        assert!(suggestions.contains(&"Reformado"));
        assert!(suggestions.contains(&"Piscina"));
        assert_eq!(
            suggestions.len(),
            PROPERTY_TYPE_TAGS.len() + PROPERTY_CONDITION_TAGS.len() + PROPERTY_AMENITY_TAGS.len()
        );
    }
}
