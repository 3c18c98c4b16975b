use sea_orm::*;

use crate::models::{book, member};

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    // 1. Create Members
    let members = vec![
        ("Ana Wijaya", "ana.wijaya@sekolah.sch.id", "S-2021-014", "student"),
        ("Budi Santoso", "budi.santoso@sekolah.sch.id", "S-2022-032", "student"),
        ("Siti Rahma", "siti.rahma@sekolah.sch.id", "T-1987-003", "teacher"),
        ("Dewi Lestari", "dewi.lestari@sekolah.sch.id", "E-2015-007", "staff"),
    ];

    for (name, email, identifier, role) in members {
        let row = member::ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            identifier: Set(identifier.to_owned()),
            role: Set(role.to_owned()),
            status: Set("active".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = member::Entity::insert(row)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(member::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;
        match res {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    // 2. Create Books
    let books = vec![
        ("Laskar Pelangi", "Andrea Hirata", "978-9793062792", "LIB-000001", "Fiksi"),
        ("Bumi Manusia", "Pramoedya Ananta Toer", "978-9799731234", "LIB-000002", "Fiksi"),
        ("Matematika Kelas X", "Kemendikbud", "978-6022821138", "LIB-000003", "Pelajaran"),
    ];

    for (title, author, isbn, barcode, category) in books {
        let row = book::ActiveModel {
            title: Set(title.to_owned()),
            author: Set(Some(author.to_owned())),
            isbn: Set(Some(isbn.to_owned())),
            barcode: Set(barcode.to_owned()),
            status: Set("available".to_owned()),
            category: Set(Some(category.to_owned())),
            language: Set(Some("Indonesia".to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = book::Entity::insert(row)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(book::Column::Barcode)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;
        match res {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
