use anyhow::{Context, Result};
use std::convert::Infallible;

use crate::cli::{Commands, ListArgs, ListsAction, ProjectAction, TaskAction};
use taskflow_core::{
    PageWindow, Project, ProjectDraft, ProjectPatch, Record, RecordId, RecordPage, Task,
    TaskDraft, TaskPatch,
};
use taskflow_local::{ItemDraft, ItemUpdate, LocalStore};
use taskflow_service::{ListRequest, ProjectService, ServiceContext, Settings, TaskService};

pub async fn execute(command: Commands, settings: Settings) -> Result<()> {
    match command {
        Commands::Task { action } => {
            let services = ServiceContext::from_settings(&settings);
            task_command(action, &services.tasks).await?;
        }

        Commands::Project { action } => {
            let services = ServiceContext::from_settings(&settings);
            project_command(action, &services.projects).await?;
        }

        Commands::Dashboard { recent } => {
            let services = ServiceContext::from_settings(&settings);
            let summary = services
                .dashboard
                .summary(recent)
                .await
                .context("Failed to load dashboard data")?;

            println!("Dashboard");
            println!("  Tasks:       {}", summary.total_tasks);
            println!("  Completed:   {}", summary.completed_tasks);
            println!("  In progress: {}", summary.in_progress_tasks);
            println!("  Projects:    {}", summary.total_projects);

            println!("\n  Tasks by priority:");
            for (priority, count) in &summary.task_statistics.priority_counts {
                println!("    {:<12} {}", priority, count);
            }

            println!("\n  Projects by status:");
            for (status, count) in &summary.project_statistics.status_counts {
                println!("    {:<12} {}", status, count);
            }

            println!("\n  Recent tasks:");
            for record in &summary.recent_tasks {
                print_task_row(record)?;
            }

            println!("\n  Recent projects:");
            for record in &summary.recent_projects {
                print_project_row(record)?;
            }
        }

        Commands::Lists { action } => {
            let store = LocalStore::open(&settings.local_store_path).await?;
            lists_command(action, &store).await?;
        }

        Commands::Serve { port } => {
            let mut settings = settings;
            if let Some(port) = port {
                settings.api_port = port;
            }

            println!("Starting API server on port {}...", settings.api_port);
            taskflow_api::serve(settings).await?;
        }
    }

    Ok(())
}

async fn task_command(action: TaskAction, tasks: &TaskService) -> Result<()> {
    match action {
        TaskAction::List {
            list,
            status,
            priority,
            category,
        } => {
            let mut request = list_request(&list);
            if let Some(status) = status {
                request = request.filter("status", status.to_string());
            }
            if let Some(priority) = priority {
                request = request.filter("priority", priority.to_string());
            }
            if let Some(category) = category {
                request = request.filter("category", category.to_string());
            }

            let page = tasks.list(&request).await.context("Failed to load tasks")?;

            println!("{:<8} {:<12} {:<8} {:<12} TITLE", "ID", "STATUS", "PRIORITY", "DUE");
            for record in &page.data {
                print_task_row(record)?;
            }
            print_window(&page, &request);
        }

        TaskAction::Get { id } => {
            match tasks.get_by_id(&parse_id(&id)).await.context("Failed to load task")? {
                Some(record) => print_record(&record)?,
                None => println!("Task not found: {}", id),
            }
        }

        TaskAction::Create {
            title,
            description,
            status,
            priority,
            category,
            due,
            assigned_to,
        } => {
            let draft = TaskDraft {
                title,
                description,
                status,
                priority,
                due_date: due,
                category,
                assigned_to,
            };
            draft.validate()?;

            let created = tasks
                .create(draft.into_record()?)
                .await
                .context("Failed to save task")?;

            println!("✓ Task created: {}", display_id(&created));
        }

        TaskAction::Update {
            id,
            title,
            description,
            status,
            priority,
            category,
            due,
            assigned_to,
        } => {
            let patch = TaskPatch {
                title,
                description,
                status,
                priority,
                due_date: due,
                category,
                assigned_to,
            };
            patch.validate()?;

            tasks
                .update(&parse_id(&id), patch.into_record()?)
                .await
                .context("Failed to save task")?;

            println!("✓ Task updated: {}", id);
        }

        TaskAction::Delete { id } => {
            tasks
                .delete(&parse_id(&id))
                .await
                .context("Failed to delete task")?;

            println!("✓ Task deleted: {}", id);
        }

        TaskAction::Stats => {
            let stats = tasks
                .statistics()
                .await
                .context("Failed to load task statistics")?;

            println!("Task Statistics:");
            println!("  By status:");
            for (status, count) in &stats.status_counts {
                println!("    {:<12} {}", status, count);
            }
            println!("  By priority:");
            for (priority, count) in &stats.priority_counts {
                println!("    {:<12} {}", priority, count);
            }
            println!("  Total: {}", stats.total());
        }
    }

    Ok(())
}

async fn project_command(action: ProjectAction, projects: &ProjectService) -> Result<()> {
    match action {
        ProjectAction::List { list, status } => {
            let mut request = list_request(&list);
            if let Some(status) = status {
                request = request.filter("status", status.to_string());
            }

            let page = projects
                .list(&request)
                .await
                .context("Failed to load projects")?;

            println!("{:<8} {:<12} {:<8} NAME", "ID", "STATUS", "MEMBERS");
            for record in &page.data {
                print_project_row(record)?;
            }
            print_window(&page, &request);
        }

        ProjectAction::Get { id } => {
            match projects
                .get_by_id(&parse_id(&id))
                .await
                .context("Failed to load project")?
            {
                Some(record) => print_record(&record)?,
                None => println!("Project not found: {}", id),
            }
        }

        ProjectAction::Create {
            name,
            description,
            status,
            start,
            end,
            members,
        } => {
            let draft = ProjectDraft {
                name,
                description,
                status,
                team_members: members,
                ..ProjectDraft::default()
            }
            .with_dates(start, end);
            draft.validate()?;

            let created = projects
                .create(draft.into_record()?)
                .await
                .context("Failed to save project")?;

            println!("✓ Project created: {}", display_id(&created));
        }

        ProjectAction::Update {
            id,
            name,
            description,
            status,
            start,
            end,
        } => {
            let patch = ProjectPatch {
                name,
                description,
                status,
                start_date: start,
                end_date: end,
                team_members: None,
            };
            patch.validate()?;

            projects
                .update(&parse_id(&id), patch.into_record()?)
                .await
                .context("Failed to save project")?;

            println!("✓ Project updated: {}", id);
        }

        ProjectAction::Delete { id } => {
            projects
                .delete(&parse_id(&id))
                .await
                .context("Failed to delete project")?;

            println!("✓ Project deleted: {}", id);
        }

        ProjectAction::Stats => {
            let stats = projects
                .statistics()
                .await
                .context("Failed to load project statistics")?;

            println!("Project Statistics:");
            for (status, count) in &stats.status_counts {
                println!("  {:<12} {}", status, count);
            }
            println!("  Total: {}", stats.total());
        }
    }

    Ok(())
}

async fn lists_command(action: ListsAction, store: &LocalStore) -> Result<()> {
    match action {
        ListsAction::Show => {
            let active = store.active_list().await?;
            for list in store.lists().await? {
                let marker = if list.id == active.id { "*" } else { " " };
                let stats = store.stats(&list.id).await?;
                println!(
                    "{} {:<44} {} ({}/{} done)",
                    marker, list.id, list.name, stats.completed, stats.total
                );
            }
        }

        ListsAction::Add { name } => {
            let list = store.add_list(&name).await?;
            println!("✓ List created: {} ({})", list.name, list.id);
        }

        ListsAction::Remove { list_id } => {
            store.delete_list(&list_id).await?;
            println!("✓ List deleted: {}", list_id);
        }

        ListsAction::Use { list_id } => {
            store.set_active(&list_id).await?;
            println!("✓ Active list: {}", list_id);
        }

        ListsAction::Items { list, filter } => {
            let list_id = resolve_list(store, list).await?;
            let items = store.items(&list_id, filter).await?;
            let stats = store.stats(&list_id).await?;

            for item in &items {
                let check = if item.completed { "x" } else { " " };
                let due = item.due_date.map(|d| d.to_string()).unwrap_or_default();
                println!(
                    "[{}] {:<44} {:<8} {:<10} {}",
                    check, item.id, item.priority.as_str(), due, item.title
                );
            }
            println!(
                "\n{} shown ({}) | total {} | active {} | completed {}",
                items.len(),
                filter,
                stats.total,
                stats.active,
                stats.completed
            );
        }

        ListsAction::AddItem {
            title,
            list,
            description,
            priority,
            due,
        } => {
            let list_id = resolve_list(store, list).await?;
            let draft = ItemDraft {
                description: description.unwrap_or_default(),
                priority,
                due_date: due,
                ..ItemDraft::new(title)
            };

            let item = store.add_item(&list_id, draft).await?;
            println!("✓ Item added: {}", item.id);
        }

        ListsAction::Toggle { item_id, list } => {
            let list_id = resolve_list(store, list).await?;
            let item = store.toggle_item(&list_id, &item_id).await?;
            let state = if item.completed { "completed" } else { "active" };
            println!("✓ {} is now {}", item.title, state);
        }

        ListsAction::Edit {
            item_id,
            list,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let list_id = resolve_list(store, list).await?;
            let update = ItemUpdate {
                title,
                description,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
                priority,
            };

            let item = store.update_item(&list_id, &item_id, update).await?;
            println!("✓ Item updated: {}", item.title);
        }

        ListsAction::DeleteItem { item_id, list } => {
            let list_id = resolve_list(store, list).await?;
            store.delete_item(&list_id, &item_id).await?;
            println!("✓ Item deleted: {}", item_id);
        }
    }

    Ok(())
}

fn list_request(args: &ListArgs) -> ListRequest {
    let mut request = ListRequest::new().page(args.page, args.limit);
    request.sort_field = args.sort.clone();
    request.sort_direction = args.direction;
    if let Some(term) = &args.search {
        request = request.search(term.clone());
    }
    request
}

async fn resolve_list(store: &LocalStore, list: Option<String>) -> Result<String> {
    match list {
        Some(id) => Ok(id),
        None => Ok(store.active_list().await?.id),
    }
}

fn parse_id(raw: &str) -> RecordId {
    raw.parse().unwrap_or_else(|never: Infallible| match never {})
}

fn display_id(record: &Record) -> String {
    RecordId::from_record(record)
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_record(record: &Record) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn print_task_row(record: &Record) -> Result<()> {
    let task = Task::from_record(record)?;
    let due = task.due_date.map(|d| d.to_string()).unwrap_or_default();
    println!(
        "{:<8} {:<12} {:<8} {:<12} {}",
        display_id(record),
        task.status,
        task.priority,
        due,
        task.title
    );
    Ok(())
}

fn print_project_row(record: &Record) -> Result<()> {
    let project = Project::from_record(record)?;
    println!(
        "{:<8} {:<12} {:<8} {}",
        display_id(record),
        project.status,
        project.member_count(),
        project.name
    );
    Ok(())
}

fn print_window(page: &RecordPage, request: &ListRequest) {
    let window = PageWindow::new(request.page, request.limit, page.total);
    if window.total == 0 {
        println!("\nNo records found");
    } else {
        println!(
            "\nShowing {}-{} of {} (page {}/{})",
            window.first_item,
            window.last_item,
            window.total,
            window.page + 1,
            window.total_pages
        );
    }
}
