//! End-to-end compilation tests through the public API.

use matchql::prelude::*;
use pretty_assertions::assert_eq;

pub struct Book;
matchql::record! { Book { ID, Name, AuthorID } }

pub struct User;
matchql::record! { User { ID, Name } }

pub struct BookWithUser;
matchql::record! {
    BookWithUser {
        ID: "id",
        Name: "name",
        AuthorID: "users.id",
        AuthorName: "users.name",
    }
}

pub struct GroupTest;
matchql::record! { GroupTest { AuthorID: "author_id", Books: "count(id)" } }

fn books() -> Schema {
    Schema::new(Dialect::MySql, TableRef::of::<Book>())
}

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

#[test]
fn eq_and_gte() {
    let f = compile(&books(), &Predicate::new().eq("author_id", "1").gte("score", 10)).unwrap();
    assert_eq!(f.sql, "`books`.`author_id` = ? AND `books`.`score` >= ?");
    assert_eq!(f.params, vec![Value::from("1"), Value::from(10)]);
}

#[test]
fn in_list() {
    let f = compile(&books(), &Predicate::new().is_in("author_id", ["1", "2", "3"])).unwrap();
    assert_eq!(f.sql, "`books`.`author_id` IN (?,?,?)");
    assert_eq!(f.params, vec![Value::from("1"), Value::from("2"), Value::from("3")]);
}

#[test]
fn grouped_or() {
    let p = Predicate::new().group(
        Predicate::new()
            .like("name", "%a%")
            .or(Predicate::new().like("name", "%b%")),
    );
    let f = compile(&books(), &p).unwrap();
    assert_eq!(f.sql, "(`books`.`name` LIKE ? OR `books`.`name` LIKE ?)");
    assert_eq!(f.params.len(), 2);
}

#[test]
fn null_checks_have_no_params() {
    let f = compile(&books(), &Predicate::new().null("deleted_at").not_null("name")).unwrap();
    assert_eq!(f.sql, "`books`.`deleted_at` IS NULL AND `books`.`name` IS NOT NULL");
    assert!(f.params.is_empty());
}

#[test]
fn empty_predicate_has_no_where() {
    let f = compile(&books(), &Predicate::new()).unwrap();
    assert!(f.is_empty());

    let stmt = Query::of::<Book>().build(Dialect::MySql, &Criteria::new()).unwrap();
    assert_eq!(
        stmt.to_sql(),
        "SELECT `books`.`id` AS id,`books`.`name` AS name,`books`.`author_id` AS author_id FROM `books`"
    );
}

#[test]
fn projection_inference() {
    let cols = infer_columns(&books(), User::meta()).unwrap();
    assert_eq!(cols.join(","), "`books`.`id` AS id,`books`.`name` AS name");

    let cols = infer_columns(&books(), BookWithUser::meta()).unwrap();
    assert_eq!(cols.len(), 4);
}

#[test]
fn join_with_in_filter() {
    let query = Query::table(TableRef::of::<Book>())
        .into_record::<BookWithUser>()
        .left_join(TableRef::of::<User>(), Predicate::new().eq_column("author_id", col("users.id")));
    let criteria = Criteria::filter(Predicate::new().is_in("author_id", ["1", "2", "3"]));
    let stmt = query.build(Dialect::MySql, &criteria).unwrap();

    assert_eq!(
        stmt.to_sql(),
        "SELECT `books`.`id` AS id,`books`.`name` AS name,users.id AS author_id,users.name AS author_name \
         FROM `books` LEFT JOIN `users` ON `books`.`author_id` = `users`.`id` \
         WHERE `books`.`author_id` IN (?,?,?)"
    );
    assert_eq!(placeholders(&stmt.to_sql()), stmt.params().len());
}

#[test]
fn group_having() {
    let query = Query::table(TableRef::of::<Book>())
        .into_record::<GroupTest>()
        .group_by_having(ident("author_id"), Predicate::new().gte("count(id)", 2));
    let criteria = Criteria::filter(Predicate::new().is_in("author_id", ["1", "2", "3"]));
    let stmt = query.build(Dialect::MySql, &criteria).unwrap();

    assert_eq!(
        stmt.to_sql(),
        "SELECT `books`.`author_id` AS author_id,count(id) AS books FROM `books` \
         WHERE `books`.`author_id` IN (?,?,?) GROUP BY `author_id` HAVING count(id) >= ?"
    );
    assert_eq!(stmt.params().last(), Some(&Value::from(2)));
    assert_eq!(placeholders(&stmt.to_sql()), stmt.params().len());
}

#[test]
fn count_statement() {
    let query = Query::of::<Book>();
    let criteria = Criteria::filter(Predicate::new().eq("author_id", "1")).limit(5);
    let stmt = query.count(Dialect::MySql, &criteria).unwrap();
    assert_eq!(stmt.to_sql(), "SELECT COUNT(*) FROM `books` WHERE `books`.`author_id` = ?");
}

#[test]
fn update_and_delete() {
    let schema = Schema::new(Dialect::MySql, "books_hello_world");
    let f = update_fields(
        &schema,
        &Assignments::new().set("id", "hello"),
        &Predicate::new().is_in("author_id", ["1", "2", "3"]),
    )
    .unwrap();
    assert_eq!(
        f.sql,
        "UPDATE `books_hello_world` SET `id`=? WHERE `books_hello_world`.`author_id` IN (?,?,?)"
    );
    assert_eq!(placeholders(&f.sql), f.params.len());

    let f = delete(&books(), &Predicate::new().lt("score", 3)).unwrap();
    assert_eq!(f.sql, "DELETE FROM `books` WHERE `books`.`score` < ?");
}

#[test]
fn placeholder_count_matches_params() {
    let predicates = vec![
        Predicate::new().eq("a", 1).neq("b", 2).lt("c", 3).lte("d", 4).gt("e", 5),
        Predicate::new().not_in("a", vec![1, 2]).is_in("b", Vec::<i64>::new()),
        Predicate::new()
            .null("a")
            .and(Predicate::new().like("b", "%x%").or(Predicate::new().eq("c", Value::Null))),
        Predicate::new().in_fragment("id", Fragment::new("SELECT book_id FROM tags WHERE tag = ?", vec!["rust".into()])),
    ];
    for p in predicates {
        let f = compile(&books(), &p).unwrap();
        assert_eq!(placeholders(&f.sql), f.params.len(), "{}", f.sql);
    }
}

#[test]
fn fingerprint_known_vector() {
    let criteria = Criteria::filter(Predicate::new().eq("hello", "world").gte("hello", "world"));
    assert_eq!(fingerprint(&criteria), "0ca96518fe5e365852b88890962a1a6a");
}

#[test]
fn sqlite_has_no_quoting() {
    let stmt = Query::of::<Book>()
        .build(Dialect::Sqlite, &Criteria::filter(Predicate::new().eq("id", 1)))
        .unwrap();
    assert_eq!(
        stmt.to_sql(),
        "SELECT books.id AS id,books.name AS name,books.author_id AS author_id FROM books WHERE books.id = ?"
    );
}
