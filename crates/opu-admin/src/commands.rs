use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use application::{
    ClientSearch, OpusRecordReconciler, ProductionWorkflow, SemenAllocationLedger, SessionContext,
    WithdrawalRequest,
};
use domain::{
    BullRepository, Client, ClientRepository, OpusField, OpusRecord, OpusRepository, PageRequest,
    ProductionBatch, ProductionDraft, ProductionRepository, SemenInputRepository, SemenOutput,
    SemenOutputRepository,
};
use infrastructure::{
    ApiClient, LabConfig, RestBullRepository, RestClientRepository, RestOpusRepository,
    RestProductionRepository, RestSemenRepository,
};

/// Backend-facing repositories shared by every command.
pub struct Services {
    config: LabConfig,
    session: Arc<SessionContext>,
    clients: Arc<dyn ClientRepository>,
    productions: Arc<dyn ProductionRepository>,
    opus: Arc<dyn OpusRepository>,
    bulls: Arc<dyn BullRepository>,
    inputs: Arc<dyn SemenInputRepository>,
    outputs: Arc<dyn SemenOutputRepository>,
}

impl Services {
    pub fn connect(config: &LabConfig) -> Result<Self> {
        let api = ApiClient::new(&config.api)?;
        let semen = Arc::new(RestSemenRepository::new(api.clone()));
        Ok(Self {
            config: config.clone(),
            session: Arc::new(SessionContext::new()),
            clients: Arc::new(RestClientRepository::new(api.clone())),
            productions: Arc::new(RestProductionRepository::new(api.clone())),
            opus: Arc::new(RestOpusRepository::new(api.clone())),
            bulls: Arc::new(RestBullRepository::new(api)),
            inputs: semen.clone(),
            outputs: semen,
        })
    }

    fn workflow(&self) -> ProductionWorkflow {
        ProductionWorkflow::new(self.session.clone(), self.productions.clone())
    }

    fn select_client(&self, client_id: i64) {
        self.session.select_client(Client::new(client_id, ""));
    }

    async fn open_production(&self, client_id: i64, production_id: i64) -> Result<ProductionBatch> {
        self.select_client(client_id);
        let batch = self
            .workflow()
            .select(production_id)
            .await
            .map_err(|e| anyhow!(e.user_message()))?;
        Ok(batch)
    }
}

pub async fn search_clients(services: &Services, query: &str) -> Result<()> {
    let search = ClientSearch::new(
        services.clients.clone(),
        services.config.search.debounce(),
        services.config.search.page_size,
    );
    search
        .on_input(query)
        .await
        .context("client search task failed")?;

    let state = search.current();
    if let Some(error) = state.error {
        return Err(anyhow!(error));
    }
    println!("{} client(s) match '{}'", state.total, state.query);
    for client in &state.clients {
        println!(
            "{:>6}  {:<32} {}",
            client.id,
            client.display_name(),
            client.document.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn print_production(batch: &ProductionBatch) {
    let header = &batch.header;
    println!("Production {} (client {})", batch.id, header.cliente_id);
    println!(
        "  fecha OPU: {}",
        header
            .fecha_opu
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  lugar: {}  finca: {}", header.lugar, header.finca);
    if !header.observacion.is_empty() {
        println!("  observacion: {}", header.observacion);
    }
    if !header.output_ids.is_empty() {
        println!("  outputs: {:?}", header.output_ids);
    }
}

pub async fn show_production(services: &Services, client_id: i64, production_id: i64) -> Result<()> {
    let batch = services.open_production(client_id, production_id).await?;
    print_production(&batch);
    Ok(())
}

pub async fn create_production(services: &Services, client_id: i64, draft: ProductionDraft) -> Result<()> {
    services.select_client(client_id);
    let batch = services
        .workflow()
        .create(draft)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    info!(production_id = batch.id, "Production created");
    print_production(&batch);
    Ok(())
}

fn print_rows(rows: &[OpusRecord]) {
    println!(
        "{:>3} {:<10} {:<10} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5} {:>6} {:>6} {:>6}",
        "#", "donante", "toro", "GI", "GII", "GIII", "viab", "tot", "CTV", "cliv", "%cliv", "%prev", "%emp"
    );
    for row in rows {
        let yields = row.yields();
        println!(
            "{:>3} {:<10} {:<10} {:>4} {:>4} {:>4} {:>4} {:>4} {:>4} {:>5} {:>6} {:>6} {:>6}",
            row.order,
            row.donante_code,
            row.toro_name.as_deref().or(row.toro.as_deref()).unwrap_or("-"),
            row.gi,
            row.gii,
            row.giii,
            row.viables,
            row.total_oocitos,
            row.ctv,
            row.clivados,
            yields.porcentaje_cliv,
            yields.porcentaje_prevision,
            yields.porcentaje_empaque,
        );
    }
}

async fn open_grid(services: &Services, client_id: i64, production_id: i64) -> Result<OpusRecordReconciler> {
    services.open_production(client_id, production_id).await?;
    let mut grid = OpusRecordReconciler::new(
        services.session.clone(),
        services.opus.clone(),
        services.bulls.clone(),
    );
    grid.load().await?;
    if let Err(e) = grid.load_bulls().await {
        warn!(error = %e, "Bull list unavailable; toro names will not resolve");
    }
    Ok(grid)
}

pub async fn list_opus(services: &Services, client_id: i64, production_id: i64) -> Result<()> {
    let grid = open_grid(services, client_id, production_id).await?;
    print_rows(grid.rows());
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(OpusField, &str)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field
        .trim()
        .parse::<OpusField>()
        .map_err(|e| anyhow!(e.user_message()))?;
    Ok((field, value.trim()))
}

pub async fn edit_opus(
    services: &Services,
    client_id: i64,
    production_id: i64,
    row: Option<usize>,
    assignments: &[String],
) -> Result<()> {
    let parsed = assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut grid = open_grid(services, client_id, production_id).await?;
    let index = match row {
        Some(index) => index,
        None => grid.add_row(),
    };
    for (field, value) in parsed {
        grid.update_field(index, field, value)
            .map_err(|e| anyhow!(e.user_message()))?;
    }

    let summary = grid.save().await.map_err(|e| anyhow!(e.user_message()))?;
    if summary.is_empty() {
        println!("No changes to save");
    } else {
        println!("Saved: {} created, {} updated", summary.created, summary.updated);
    }
    print_rows(grid.rows());
    Ok(())
}

pub async fn remove_opus(services: &Services, client_id: i64, production_id: i64, row: usize) -> Result<()> {
    let mut grid = open_grid(services, client_id, production_id).await?;
    let removed = grid
        .remove_row(row)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Removed row {} ({})", removed.order, removed.donante_code);
    Ok(())
}

fn open_ledger(services: &Services, client_id: i64) -> SemenAllocationLedger {
    services.select_client(client_id);
    SemenAllocationLedger::new(
        services.session.clone(),
        services.inputs.clone(),
        services.outputs.clone(),
    )
    .with_status_window(services.config.ledger.status_window())
    .with_page(PageRequest::first(services.config.ledger.page_size))
}

pub async fn list_inputs(services: &Services, client_id: i64, page: u64, bull: Option<i64>) -> Result<()> {
    let mut ledger = open_ledger(services, client_id);
    let limit = services.config.ledger.page_size;
    ledger.set_page(PageRequest::new(page * limit, limit));
    ledger.refresh().await.map_err(|e| anyhow!(e.user_message()))?;

    println!(
        "{:>6} {:<20} {:>8} {:>8} {:>10}",
        "id", "toro", "recibido", "usado", "disponible"
    );
    for input in ledger.rows() {
        println!(
            "{:>6} {:<20} {:>8} {:>8} {:>10}",
            input.id,
            input.display_bull(),
            input.quantity_received,
            input.quantity_taken,
            input.available()
        );
    }
    let balance = ledger.balance(bull);
    println!(
        "Page {} of {} input(s). Balance: {} received, {} taken, {} available",
        ledger.page().page_index() + 1,
        ledger.total(),
        balance.received,
        balance.taken,
        balance.available
    );
    Ok(())
}

pub async fn withdraw(
    services: &Services,
    client_id: i64,
    input_id: i64,
    quantity_taken: i64,
    remark: Option<String>,
    production_id: Option<i64>,
) -> Result<()> {
    let mut request = WithdrawalRequest::new(input_id, quantity_taken);
    if let Some(remark) = remark {
        request = request.with_remark(remark);
    }
    if let Some(production_id) = production_id {
        services.open_production(client_id, production_id).await?;
        request = request.for_production();
    }

    let mut ledger = open_ledger(services, client_id);
    ledger.refresh().await.map_err(|e| anyhow!(e.user_message()))?;
    let output = ledger
        .commit_withdrawal(request)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    println!(
        "Output {} recorded: {} straw(s) from input {} ({})",
        output.id, output.quantity_output, output.input_id, output.remark
    );
    if let Some(input) = ledger.row(input_id) {
        println!("Input {} now has {} available", input.id, input.available());
    }

    if production_id.is_some() {
        match link_to_production(&services.workflow(), &output).await {
            Some(batch) => println!("Linked to production {}", batch.id),
            None => eprintln!(
                "Warning: output {} was recorded but could not be linked to the production",
                output.id
            ),
        }
    }
    Ok(())
}

/// Links a recorded output to the open batch. The output already exists on
/// the backend, so a failed link is only reported.
async fn link_to_production(workflow: &ProductionWorkflow, output: &SemenOutput) -> Option<ProductionBatch> {
    match workflow.link_output(output).await {
        Ok(batch) => {
            info!(production_id = batch.id, output_id = output.id, "Output linked to production");
            Some(batch)
        }
        Err(e) => {
            warn!(output_id = output.id, error = %e, "Output recorded but not linked to production");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DomainError;
    use domain::production::MockProductionRepository;

    #[test]
    fn test_parse_assignment() {
        let (field, value) = parse_assignment("ctv = 15").unwrap();
        assert_eq!(field, OpusField::Ctv);
        assert_eq!(value, "15");

        assert!(parse_assignment("ctv").is_err());
        let err = parse_assignment("color=red").unwrap_err();
        assert_eq!(err.to_string(), "Campo desconocido: color");
    }

    fn open_session() -> Arc<SessionContext> {
        let session = SessionContext::new();
        session.select_client(Client::new(3, ""));
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 14).unwrap();
        session.set_production(ProductionBatch {
            id: 20,
            header: ProductionDraft::new(3, date),
        });
        Arc::new(session)
    }

    fn output(id: i64) -> SemenOutput {
        SemenOutput {
            id,
            input_id: 1,
            quantity_output: 3,
            output_date: None,
            remark: "Registro automático".to_string(),
            produccion_embrionaria_id: Some(20),
        }
    }

    #[tokio::test]
    async fn test_failed_link_is_not_an_error() {
        let mut repo = MockProductionRepository::new();
        repo.expect_update()
            .times(1)
            .returning(|_, _| Err(DomainError::Network("connection reset".to_string())));
        let workflow = ProductionWorkflow::new(open_session(), Arc::new(repo));

        assert!(link_to_production(&workflow, &output(900)).await.is_none());
    }

    #[tokio::test]
    async fn test_link_persists_output_id() {
        let mut repo = MockProductionRepository::new();
        repo.expect_update()
            .withf(|id, draft| *id == 20 && draft.output_ids == vec![900])
            .times(1)
            .returning(|id, draft| {
                Ok(ProductionBatch {
                    id,
                    header: draft.clone(),
                })
            });
        let workflow = ProductionWorkflow::new(open_session(), Arc::new(repo));

        let batch = link_to_production(&workflow, &output(900)).await.unwrap();
        assert_eq!(batch.header.output_ids, vec![900]);
    }
}
