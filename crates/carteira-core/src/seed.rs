use chrono::{Days, NaiveDate};

use crate::appointment::Appointment;
use crate::client::{Client, ClientAddress};
use crate::datetime::format_display_date;
use crate::property::{Property, PropertyAddress};
use crate::store::RecordId;

#[must_use]
pub fn sample_clients(today: NaiveDate) -> Vec<Client> {
    let contact = |days_ago: u64| {
        format_display_date(today.checked_sub_days(Days::new(days_ago)).unwrap_or(today))
    };

    vec![
        Client {
            id: RecordId::default(),
            name: "João Silva".to_string(),
            email: "joao.silva@example.com.br".to_string(),
            phone: "(11) 99999-9999".to_string(),
            address: ClientAddress {
                street: "Rua Augusta, 910".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                country: "Brasil".to_string(),
                postal_code: "01304-001".to_string(),
            },
            notes: "Procura apartamento de 2 quartos perto do metrô".to_string(),
            tags: vec!["Em Atendimento".to_string()],
            last_contact: contact(1),
        },
        Client {
            id: RecordId::default(),
            name: "Maria Santos".to_string(),
            email: "maria.santos@example.com.br".to_string(),
            phone: "(11) 88888-8888".to_string(),
            address: ClientAddress {
                street: "Avenida Paulista, 1500".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                country: "Brasil".to_string(),
                postal_code: "01310-200".to_string(),
            },
            notes: "Aguardando resposta da proposta pela casa".to_string(),
            tags: vec!["Proposta Enviada".to_string()],
            last_contact: contact(3),
        },
        Client {
            id: RecordId::default(),
            name: "Pedro Oliveira".to_string(),
            email: "pedro.oliveira@example.com.br".to_string(),
            phone: "(11) 77777-7777".to_string(),
            address: ClientAddress {
                street: "Rua Oscar Freire, 72".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                country: "Brasil".to_string(),
                postal_code: "01426-000".to_string(),
            },
            notes: "Interessado em terreno para construir".to_string(),
            tags: vec!["Novo Lead".to_string()],
            last_contact: contact(8),
        },
    ]
}

#[must_use]
pub fn sample_properties() -> Vec<Property> {
    vec![
        Property {
            id: RecordId::default(),
            address: PropertyAddress {
                street: "Rua das Flores".to_string(),
                number: "123".to_string(),
                unit: Some("Apto 45".to_string()),
                neighborhood: "Centro".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: "01020-030".to_string(),
            },
            price: "450.000".to_string(),
            area: "65".to_string(),
            bedrooms: "2".to_string(),
            bathrooms: "1".to_string(),
            parking: "1".to_string(),
            tags: vec!["Apartamento".to_string(), "Usado".to_string()],
            notes: None,
            images: Vec::new(),
        },
        Property {
            id: RecordId::default(),
            address: PropertyAddress {
                street: "Avenida Principal".to_string(),
                number: "456".to_string(),
                unit: None,
                neighborhood: "Jardins".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: "01432-000".to_string(),
            },
            price: "780.000".to_string(),
            area: "180".to_string(),
            bedrooms: "3".to_string(),
            bathrooms: "2".to_string(),
            parking: "2".to_string(),
            tags: vec!["Casa".to_string(), "Piscina".to_string()],
            notes: Some("Cliente quer verificar estado da piscina".to_string()),
            images: Vec::new(),
        },
        Property {
            id: RecordId::default(),
            address: PropertyAddress {
                street: "Rua Nova".to_string(),
                number: "789".to_string(),
                unit: None,
                neighborhood: "Vila Nova".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                postal_code: "02145-010".to_string(),
            },
            price: "320.000".to_string(),
            area: "300".to_string(),
            bedrooms: "0".to_string(),
            bathrooms: "0".to_string(),
            parking: "0".to_string(),
            tags: vec!["Terreno".to_string(), "Novo".to_string()],
            notes: Some("Verificar documentação do terreno".to_string()),
            images: Vec::new(),
        },
    ]
}

#[must_use]
pub fn sample_appointments(today: NaiveDate) -> Vec<Appointment> {
    let yesterday = format_display_date(today.checked_sub_days(Days::new(1)).unwrap_or(today));
    let current = format_display_date(today);
    let tomorrow = format_display_date(today.checked_add_days(Days::new(1)).unwrap_or(today));

    vec![
        Appointment {
            id: RecordId::default(),
            title: "Visita ao apartamento".to_string(),
            time: "14:00".to_string(),
            location: "Rua das Flores, 123".to_string(),
            date: yesterday.clone(),
            tags: vec!["visita".to_string(), "imóvel".to_string()],
            client: Some("João Silva".to_string()),
            property: Some("Apartamento - Rua das Flores, 123".to_string()),
            note: "Cliente interessado em reformar a cozinha".to_string(),
        },
        Appointment {
            id: RecordId::default(),
            title: "Assinatura de contrato".to_string(),
            time: "16:30".to_string(),
            location: "Escritório Central".to_string(),
            date: yesterday,
            tags: vec!["contrato".to_string(), "documentação".to_string()],
            client: Some("Maria Santos".to_string()),
            property: None,
            note: "Trazer cópia do contrato e documentos necessários".to_string(),
        },
        Appointment {
            id: RecordId::default(),
            title: "Visita à casa".to_string(),
            time: "10:00".to_string(),
            location: "Avenida Principal, 456".to_string(),
            date: current.clone(),
            tags: vec!["visita".to_string(), "imóvel".to_string()],
            client: Some("Pedro Oliveira".to_string()),
            property: Some("Casa - Avenida Principal, 456".to_string()),
            note: "Cliente quer verificar estado da piscina".to_string(),
        },
        Appointment {
            id: RecordId::default(),
            title: "Reunião com cliente".to_string(),
            time: "15:00".to_string(),
            location: "Café Central".to_string(),
            date: current,
            tags: vec!["reunião".to_string(), "cliente".to_string()],
            client: Some("João Silva".to_string()),
            property: None,
            note: "Discutir opções de financiamento".to_string(),
        },
        Appointment {
            id: RecordId::default(),
            title: "Visita ao terreno".to_string(),
            time: "09:30".to_string(),
            location: "Rua Nova, 789".to_string(),
            date: tomorrow.clone(),
            tags: vec!["visita".to_string(), "terreno".to_string()],
            client: Some("Maria Santos".to_string()),
            property: Some("Terreno - Rua Nova, 789".to_string()),
            note: "Verificar documentação do terreno".to_string(),
        },
        Appointment {
            id: RecordId::default(),
            title: "Apresentação de imóvel".to_string(),
            time: "11:00".to_string(),
            location: "Condomínio Vista Linda".to_string(),
            date: tomorrow,
            tags: vec!["apresentação".to_string(), "imóvel".to_string()],
            client: Some("Pedro Oliveira".to_string()),
            property: Some("Apartamento - Rua das Flores, 123".to_string()),
            note: "Mostrar área de lazer do condomínio".to_string(),
        },
    ]
}
